//! Core types for the lifespan sweep library
//!
//! This module defines the values that flow through the library: the person
//! records callers hand in, the point events built from them, and the result
//! the sweep emits. Every type here is a plain immutable value - the library
//! keeps no state between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Year type used throughout the library (signed, no range assumed)
pub type Year = i64;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Errors that can occur while building events or sweeping them
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    /// A single record is malformed; the record is skipped, the batch continues
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// No record in the batch yielded a valid event
    #[error("No valid records found")]
    NoData,

    /// The event sequence contains no births, so there is nothing to count
    #[error("Event sequence contains no birth events")]
    EmptyInput,
}

/// A person as supplied by the caller, with years already parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Person name (must be non-empty)
    pub name: String,
    /// Year of birth
    pub birth_year: Year,
    /// Year of death, `None` if still alive
    pub death_year: Option<Year>,
}

impl PersonRecord {
    /// Create a record for someone who has died
    pub fn new(name: impl Into<String>, birth_year: Year, death_year: Year) -> Self {
        Self {
            name: name.into(),
            birth_year,
            death_year: Some(death_year),
        }
    }

    /// Create a record for someone still alive
    pub fn alive(name: impl Into<String>, birth_year: Year) -> Self {
        Self {
            name: name.into(),
            birth_year,
            death_year: None,
        }
    }
}

/// An un-parsed row from tabular input
///
/// `line` is the 1-based position in the source and is only used to label
/// rejections. A `death` of `None` or a blank string means "still alive".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub line: usize,
    pub name: String,
    pub birth: String,
    pub death: Option<String>,
}

impl RawRecord {
    pub fn new(
        line: usize,
        name: impl Into<String>,
        birth: impl Into<String>,
        death: Option<String>,
    ) -> Self {
        Self {
            line,
            name: name.into(),
            birth: birth.into(),
            death,
        }
    }
}

/// Kind of a life event
///
/// The derived ordering puts `Birth` before `Death`, which is the tie-break
/// the sweep relies on for events in the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Birth,
    Death,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Birth => write!(f, "Birth"),
            EventKind::Death => write!(f, "Death"),
        }
    }
}

/// A single birth or death at a given year
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Person the event belongs to (diagnostics only)
    pub subject: String,
    pub year: Year,
    pub kind: EventKind,
}

impl Event {
    pub fn birth(subject: impl Into<String>, year: Year) -> Self {
        Self {
            subject: subject.into(),
            year,
            kind: EventKind::Birth,
        }
    }

    pub fn death(subject: impl Into<String>, year: Year) -> Self {
        Self {
            subject: subject.into(),
            year,
            kind: EventKind::Death,
        }
    }

    /// Key for the sweep order: year ascending, births before deaths
    pub fn sweep_key(&self) -> (Year, EventKind) {
        (self.year, self.kind)
    }

    pub fn is_birth(&self) -> bool {
        self.kind == EventKind::Birth
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Event: {} Year: {}", self.kind, self.subject, self.year)
    }
}

/// A span of years at which the maximum concurrency held
///
/// Serialized as `{"start": .., "end": ..}` with `end: null` for open ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RangeRepr", from = "RangeRepr")]
pub enum YearRange {
    /// Closed span, `start <= end`; equal bounds mean a single year
    Bounded { start: Year, end: Year },
    /// Span that is still running ("through present")
    OpenEnded { start: Year },
}

impl YearRange {
    pub fn start(&self) -> Year {
        match self {
            YearRange::Bounded { start, .. } => *start,
            YearRange::OpenEnded { start } => *start,
        }
    }

    /// Right bound, `None` for an open range
    pub fn end(&self) -> Option<Year> {
        match self {
            YearRange::Bounded { end, .. } => Some(*end),
            YearRange::OpenEnded { .. } => None,
        }
    }

    pub fn is_single_year(&self) -> bool {
        matches!(self, YearRange::Bounded { start, end } if start == end)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, YearRange::OpenEnded { .. })
    }

    /// Check whether a year falls inside this range
    pub fn contains(&self, year: Year) -> bool {
        match self {
            YearRange::Bounded { start, end } => (*start..=*end).contains(&year),
            YearRange::OpenEnded { start } => year >= *start,
        }
    }

    /// Check whether two ranges share at least one year
    pub fn overlaps(&self, other: &YearRange) -> bool {
        let (a, b) = if self.start() <= other.start() {
            (self, other)
        } else {
            (other, self)
        };
        a.contains(b.start())
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearRange::Bounded { start, end } if start == end => write!(f, "{}", start),
            YearRange::Bounded { start, end } => write!(f, "{}-{}", start, end),
            YearRange::OpenEnded { start } => write!(f, "{}-present", start),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RangeRepr {
    start: Year,
    end: Option<Year>,
}

impl From<YearRange> for RangeRepr {
    fn from(range: YearRange) -> Self {
        RangeRepr {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<RangeRepr> for YearRange {
    fn from(repr: RangeRepr) -> Self {
        match repr.end {
            Some(end) => YearRange::Bounded {
                start: repr.start,
                end,
            },
            None => YearRange::OpenEnded { start: repr.start },
        }
    }
}

/// Outcome of a sweep: the peak number alive and every span where it held
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Highest number of people alive at the same time
    pub max_alive: usize,
    /// Disjoint spans at that level, in increasing year order
    pub ranges: Vec<YearRange>,
}
