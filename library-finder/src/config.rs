//! Configuration for cache freshness and record filtering.

use crate::freshness::DEFAULT_MAX_AGE_DAYS;

/// Latitudes of source records known to carry bad coordinates.
pub const KNOWN_BAD_LATITUDES: &[f64] = &[53.047014];

/// Rules for discarding source records during a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    /// Records whose latitude exactly matches one of these are dropped.
    pub known_bad_latitudes: Vec<f64>,
}

impl RecordFilter {
    /// Create a filter with the given blocklisted latitudes.
    pub fn new(known_bad_latitudes: Vec<f64>) -> Self {
        Self {
            known_bad_latitudes,
        }
    }

    /// Whether a latitude is on the blocklist.
    pub fn is_blocklisted(&self, latitude: f64) -> bool {
        self.known_bad_latitudes.contains(&latitude)
    }
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::new(KNOWN_BAD_LATITUDES.to_vec())
    }
}

/// Configuration for the library finder.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    /// Cache age in days beyond which a refresh is due.
    pub max_age_days: u32,

    /// Which source records to discard when refreshing.
    pub filter: RecordFilter,
}

impl FinderConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_age_days: u32, filter: RecordFilter) -> Self {
        Self {
            max_age_days,
            filter,
        }
    }

    /// Set the maximum cache age.
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS, // ~6 months
            filter: RecordFilter::default(),
        }
    }
}
