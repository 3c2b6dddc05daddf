//! Report generation
//!
//! Renders the roster of each input file and the sweep result as plain text
//! lines (tab-indented) or as a JSON document.

use lifespan_sweep::{PersonRecord, SweepResult, YearRange};
use serde::Serialize;
use std::path::PathBuf;

/// Shown when no file produced a single valid record
pub const NO_DATA_MESSAGE: &str = "ERROR: No valid data found so no dates were generated. \
Please be sure to supply a properly-formatted csv file with name, birthyear, [deathyear].";

/// Shown under a file that produced no valid records
pub const EMPTY_FILE_MESSAGE: &str = "ERROR: No properly-formatted names and dates found in file.";

/// Valid people read from one file
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: PathBuf,
    pub people: Vec<PersonRecord>,
    pub rejected: usize,
}

/// Text report built line by line
#[derive(Debug, Default)]
pub struct TextReport {
    buf: String,
}

impl TextReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, indented with tabs
    pub fn line(&mut self, indentation: usize, text: impl AsRef<str>) {
        for _ in 0..indentation {
            self.buf.push('\t');
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// `Data from:` header, one line per person, then a blank line
    pub fn roster(&mut self, source: &SourceSummary, show_people: bool) {
        self.line(0, format!("Data from: {}", source.path.display()));
        if show_people {
            for person in &source.people {
                self.line(1, lifespan_label(person));
            }
        }
        if source.people.is_empty() {
            self.line(1, EMPTY_FILE_MESSAGE);
        }
        self.blank();
    }

    pub fn result(&mut self, result: &SweepResult) {
        let alive = format!(
            "Most number of people alive at the same time was {}",
            result.max_alive
        );

        match result.ranges.as_slice() {
            [] => self.line(0, format!("{}.", alive)),
            [range] if range.is_single_year() => {
                self.line(0, format!("{} in the year {}.", alive, range.start()))
            }
            [range] => self.line(
                0,
                format!(
                    "{} between the years of {} and {}.",
                    alive,
                    range.start(),
                    end_label(range)
                ),
            ),
            ranges => {
                self.line(0, format!("{} in the following years: ", alive));
                for range in ranges {
                    self.line(1, range.to_string());
                }
            }
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// `Name (1950 - 1980)` or `Name (1950 - present)`
pub fn lifespan_label(person: &PersonRecord) -> String {
    match person.death_year {
        Some(death) => format!("{} ({} - {})", person.name, person.birth_year, death),
        None => format!("{} ({} - present)", person.name, person.birth_year),
    }
}

fn end_label(range: &YearRange) -> String {
    match range.end() {
        Some(end) => end.to_string(),
        None => "present".to_string(),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    sources: &'a [SourceSummary],
    result: &'a SweepResult,
}

/// Render the sources and result as pretty JSON
pub fn render_json(sources: &[SourceSummary], result: &SweepResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { sources, result })
}
