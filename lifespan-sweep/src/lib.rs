//! Lifespan Sweep Library
//!
//! A stateless library that finds the years in which the most people were
//! alive at the same time, given birth and (optional) death years.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on the computation:
//! - [`EventBuilder`] turns person records into birth/death events
//! - [`OverlapSweeper`] sorts the events and walks them once, tracking the
//!   live count and every span of years at the maximum
//!
//! The library does NOT:
//! - Read files or parse CSV
//! - Format results for display
//! - Merge multiple input sources
//!
//! All of that is in the application layer (lifespan-cli).
//!
//! # Example Usage
//!
//! ```
//! use lifespan_sweep::{analyze, PersonRecord, SweepConfig, YearRange};
//!
//! let records = vec![
//!     PersonRecord::new("A", 1950, 1980),
//!     PersonRecord::new("B", 1960, 1990),
//! ];
//!
//! let result = analyze(&records, &SweepConfig::new()).unwrap();
//! assert_eq!(result.max_alive, 2);
//! assert_eq!(result.ranges, vec![YearRange::Bounded { start: 1960, end: 1980 }]);
//! ```

// Public modules
pub mod builder;
pub mod config;
pub mod sweep;
pub mod types;

// Re-export main types for convenience
pub use builder::{EventBatch, EventBuilder};
pub use config::{SweepConfig, ValidationPolicy, YearWindow};
pub use sweep::OverlapSweeper;
pub use types::{
    Event, EventKind, PersonRecord, RawRecord, Result, SweepError, SweepResult, Year, YearRange,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build events from parsed records and sweep them
pub fn analyze(records: &[PersonRecord], config: &SweepConfig) -> Result<SweepResult> {
    let events = EventBuilder::with_config(config.clone()).build(records)?;
    OverlapSweeper::new().sweep(&events)
}

/// Build events from raw rows and sweep them
pub fn analyze_raw(rows: &[RawRecord], config: &SweepConfig) -> Result<SweepResult> {
    let events = EventBuilder::with_config(config.clone()).build_raw(rows)?;
    OverlapSweeper::new().sweep(&events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: one person alive gives an open range
        let result = analyze(&[PersonRecord::alive("A", 1990)], &SweepConfig::new()).unwrap();
        assert_eq!(result.max_alive, 1);
        assert!(result.ranges[0].is_open());
    }

    #[test]
    fn test_analyze_raw_no_data() {
        let rows = vec![RawRecord::new(1, "", "1950", None)];
        assert_eq!(analyze_raw(&rows, &SweepConfig::new()), Err(SweepError::NoData));
    }

    #[test]
    fn test_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventBuilder>();
        assert_send_sync::<OverlapSweeper>();
        assert_send_sync::<SweepResult>();
    }
}
