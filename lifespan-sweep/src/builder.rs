//! Event construction
//!
//! EventBuilder turns person records into a flat list of birth/death events.
//! Malformed records are skipped individually; only a batch that produces no
//! events at all is an error.

use crate::config::SweepConfig;
use crate::types::{Event, PersonRecord, RawRecord, Result, SweepError, Year};

/// Events built from a batch together with the records that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBatch {
    /// Events in input order (births and deaths interleaved per person)
    pub events: Vec<Event>,
    /// One `SweepError::InvalidRecord` per skipped record
    pub rejected: Vec<SweepError>,
    /// Number of records that produced events
    pub accepted: usize,
}

/// Builds point events from person records
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    config: SweepConfig,
}

impl EventBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Build events from parsed records
    ///
    /// Records are numbered from 1 in rejection messages.
    ///
    /// # Returns
    /// * `Ok(events)` - at least one record was valid
    /// * `Err(SweepError::NoData)` - nothing usable in the batch
    pub fn build(&self, records: &[PersonRecord]) -> Result<Vec<Event>> {
        self.build_batch(records).map(|batch| batch.events)
    }

    /// Like [`build`](Self::build) but also returns the rejected records
    pub fn build_batch(&self, records: &[PersonRecord]) -> Result<EventBatch> {
        let mut batch = EventBatch::default();

        for (index, record) in records.iter().enumerate() {
            let line = index + 1;
            match self.check(line, &record.name, record.birth_year, record.death_year) {
                Ok(()) => {
                    push_events(&mut batch, &record.name, record.birth_year, record.death_year)
                }
                Err(e) => reject(&mut batch, e),
            }
        }

        finish(batch)
    }

    /// Build events from records that already passed [`parse_row`](Self::parse_row)
    ///
    /// No checks are repeated, so nothing is rejected or logged twice; only
    /// an empty input is an error (`SweepError::NoData`).
    pub fn build_validated(&self, records: &[PersonRecord]) -> Result<Vec<Event>> {
        let mut batch = EventBatch::default();
        for record in records {
            push_events(&mut batch, &record.name, record.birth_year, record.death_year);
        }
        finish(batch).map(|batch| batch.events)
    }

    /// Build events from raw string rows, parsing the years
    pub fn build_raw(&self, rows: &[RawRecord]) -> Result<Vec<Event>> {
        self.build_raw_batch(rows).map(|batch| batch.events)
    }

    /// Like [`build_raw`](Self::build_raw) but also returns the rejected rows
    pub fn build_raw_batch(&self, rows: &[RawRecord]) -> Result<EventBatch> {
        let mut batch = EventBatch::default();

        for row in rows {
            match self.parse_row(row) {
                Ok(record) => {
                    push_events(&mut batch, &record.name, record.birth_year, record.death_year)
                }
                Err(e) => reject(&mut batch, e),
            }
        }

        finish(batch)
    }

    /// Parse and validate a single raw row
    pub fn parse_row(&self, row: &RawRecord) -> Result<PersonRecord> {
        let name = row.name.trim();
        let birth_year = self.parse_year(row.line, "birth", &row.birth)?;
        let death_year = match row.death.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(death) => Some(self.parse_year(row.line, "death", death)?),
        };

        self.check(row.line, name, birth_year, death_year)?;

        Ok(PersonRecord {
            name: name.to_string(),
            birth_year,
            death_year,
        })
    }

    fn parse_year(&self, line: usize, field: &str, text: &str) -> Result<Year> {
        let text = text.trim();
        let year: Year = text.parse().map_err(|_| SweepError::InvalidRecord {
            line,
            reason: format!("unparseable {} year '{}'", field, text),
        })?;
        Ok(self.config.normalize_year(year))
    }

    /// Apply the record rules: non-empty name, then the policy-driven checks
    fn check(&self, line: usize, name: &str, birth: Year, death: Option<Year>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SweepError::InvalidRecord {
                line,
                reason: "empty name".to_string(),
            });
        }

        for year in std::iter::once(birth).chain(death) {
            if !self.config.year_in_window(year) {
                self.soft_violation(
                    line,
                    format!("{}: year {} outside expected range", name, year),
                )?;
            }
        }

        if let Some(death) = death {
            if death < birth {
                self.soft_violation(
                    line,
                    format!("{}: death year {} before birth year {}", name, death, birth),
                )?;
            }
        }

        Ok(())
    }

    fn soft_violation(&self, line: usize, reason: String) -> Result<()> {
        if self.config.is_strict() {
            Err(SweepError::InvalidRecord { line, reason })
        } else {
            log::warn!("Line {}: {} (kept)", line, reason);
            Ok(())
        }
    }
}

fn push_events(batch: &mut EventBatch, name: &str, birth: Year, death: Option<Year>) {
    let birth_event = Event::birth(name, birth);
    log::trace!("{}", birth_event);
    batch.events.push(birth_event);

    if let Some(death) = death {
        let death_event = Event::death(name, death);
        log::trace!("{}", death_event);
        batch.events.push(death_event);
    }
    batch.accepted += 1;
}

fn reject(batch: &mut EventBatch, error: SweepError) {
    log::warn!("Skipping record: {}", error);
    batch.rejected.push(error);
}

fn finish(batch: EventBatch) -> Result<EventBatch> {
    if batch.events.is_empty() {
        return Err(SweepError::NoData);
    }
    log::debug!(
        "Built {} events from {} records ({} rejected)",
        batch.events.len(),
        batch.accepted,
        batch.rejected.len()
    );
    Ok(batch)
}
