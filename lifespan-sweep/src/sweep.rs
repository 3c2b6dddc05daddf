//! The overlap sweep
//!
//! Events are ordered by year with births ahead of deaths in the same year,
//! then walked once. A death closes the span that started at the most recent
//! birth, at the count that held during that span. After the walk, whatever
//! is still alive closes an open-ended span.
//!
//! All accumulators live in a [`SweepState`] created per call, so a sweeper
//! can be shared freely between threads.

use crate::types::{Event, EventKind, Result, SweepError, SweepResult, Year, YearRange};

/// Sorts events and finds the spans of peak concurrency
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapSweeper;

impl OverlapSweeper {
    pub fn new() -> Self {
        Self
    }

    /// Sweep the events and return the maximum alive count with its spans
    ///
    /// The input may be in any order; it is not modified.
    ///
    /// # Returns
    /// * `Err(SweepError::EmptyInput)` if there are no birth events
    pub fn sweep(&self, events: &[Event]) -> Result<SweepResult> {
        if !events.iter().any(Event::is_birth) {
            return Err(SweepError::EmptyInput);
        }

        let mut ordered: Vec<&Event> = events.iter().collect();
        ordered.sort_by_key(|event| event.sweep_key());
        log::debug!("Sweeping {} life events", ordered.len());

        let mut state = SweepState::default();
        for event in ordered {
            log::trace!("Processing event: {}", event);
            match event.kind {
                EventKind::Birth => state.birth(event.year),
                EventKind::Death => state.death(event),
            }
        }

        Ok(state.finish())
    }
}

/// Running totals for a single sweep
#[derive(Debug, Default)]
struct SweepState {
    live_count: usize,
    last_birth_year: Option<Year>,
    max_alive: usize,
    best_ranges: Vec<YearRange>,
}

impl SweepState {
    fn birth(&mut self, year: Year) {
        self.live_count += 1;
        self.last_birth_year = Some(year);
    }

    fn death(&mut self, event: &Event) {
        // Sorted order guarantees event.year >= start
        match self.last_birth_year {
            Some(start) => self.record(YearRange::Bounded {
                start,
                end: event.year,
            }),
            None => log::warn!("{} dies in {} before any birth", event.subject, event.year),
        }

        if self.live_count == 0 {
            log::warn!("Death of {} without a matching birth", event.subject);
        }
        self.live_count = self.live_count.saturating_sub(1);
    }

    /// Apply the range-update rule at the current count
    fn record(&mut self, range: YearRange) {
        let count = self.live_count;
        if count > self.max_alive {
            log::debug!("New maximum {} alive in {}", count, range);
            self.best_ranges.clear();
            self.max_alive = count;
            self.best_ranges.push(range);
        } else if count == self.max_alive && self.max_alive > 0 {
            log::debug!("Tie at {} alive in {}", count, range);
            self.best_ranges.push(range);
        }
    }

    /// Close the tail with an open-ended span and produce the result
    fn finish(mut self) -> SweepResult {
        if let Some(start) = self.last_birth_year {
            self.record(YearRange::OpenEnded { start });
        }

        SweepResult {
            max_alive: self.max_alive,
            ranges: self.best_ranges,
        }
    }
}
