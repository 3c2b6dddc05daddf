//! Sweep configuration types
//!
//! This module defines the small amount of configuration the library accepts.
//! The sweep itself has no knobs; everything here governs how EventBuilder
//! treats records that look suspicious (years outside the expected window,
//! deaths before births, two-digit years).

use crate::types::Year;
use serde::{Deserialize, Serialize};

/// How to treat records whose years break the soft domain expectations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Log a warning and keep the record (best effort)
    #[default]
    Lenient,
    /// Reject the record as invalid
    Strict,
}

/// Inclusive window of years the input is expected to fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub first: Year,
    pub last: Year,
}

impl YearWindow {
    pub fn new(first: Year, last: Year) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, year: Year) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::new(1900, 2000)
    }
}

/// Configuration for building events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Policy for out-of-window years and deaths before births
    #[serde(default)]
    pub policy: ValidationPolicy,

    /// Expected year window (None = no window check)
    #[serde(default = "default_window")]
    pub expected_years: Option<YearWindow>,

    /// Shift parsed years in 0..100 up by 1900 (raw rows only)
    #[serde(default)]
    pub two_digit_years: bool,
}

fn default_window() -> Option<YearWindow> {
    Some(YearWindow::default())
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            expected_years: default_window(),
            two_digit_years: false,
        }
    }
}

impl SweepConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the validation policy
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder method: set the expected year window
    pub fn with_expected_years(mut self, first: Year, last: Year) -> Self {
        self.expected_years = Some(YearWindow::new(first, last));
        self
    }

    /// Builder method: disable the year window check
    pub fn without_expected_years(mut self) -> Self {
        self.expected_years = None;
        self
    }

    /// Builder method: enable or disable the two-digit year shift
    pub fn with_two_digit_years(mut self, enabled: bool) -> Self {
        self.two_digit_years = enabled;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.policy == ValidationPolicy::Strict
    }

    /// Check if a year is acceptable under the window (no window = all years)
    pub fn year_in_window(&self, year: Year) -> bool {
        match &self.expected_years {
            Some(window) => window.contains(year),
            None => true,
        }
    }

    /// Apply the two-digit shift if enabled
    pub fn normalize_year(&self, year: Year) -> Year {
        if self.two_digit_years && (0..100).contains(&year) {
            year + 1900
        } else {
            year
        }
    }
}
