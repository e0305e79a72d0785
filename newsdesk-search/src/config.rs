//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the debounce window, recent-search retention,
//! suggestion list size and the fuzzy fallback. The defaults match the
//! dashboard's search bar.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SearchError;

/// Configuration for the search bar and its engine.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search runs.
    pub debounce_ms: u64,
    /// Maximum number of remembered recent searches.
    pub recent_capacity: usize,
    /// Minimum trimmed length for a term to be remembered.
    pub recent_min_len: usize,
    /// Maximum number of entries in the suggestion list.
    pub suggestion_limit: usize,
    /// Largest tolerated distance for the fuzzy title-word fallback.
    pub fuzzy_max_distance: usize,
    /// Shortest query term that may use the fuzzy fallback.
    pub fuzzy_min_term_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recent_capacity: 5,
            recent_min_len: 2,
            suggestion_limit: 6,
            fuzzy_max_distance: 1,
            fuzzy_min_term_len: 3,
        }
    }
}

impl SearchConfig {
    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `recent_capacity` must be greater than 0
    /// - `suggestion_limit` must be greater than 0
    /// - `fuzzy_min_term_len` must be greater than `fuzzy_max_distance`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.recent_capacity == 0 {
            return Err(SearchError::Config(
                "recent_capacity must be greater than 0".into(),
            ));
        }
        if self.suggestion_limit == 0 {
            return Err(SearchError::Config(
                "suggestion_limit must be greater than 0".into(),
            ));
        }
        if self.fuzzy_min_term_len <= self.fuzzy_max_distance {
            return Err(SearchError::Config(
                "fuzzy_min_term_len must be greater than fuzzy_max_distance".into(),
            ));
        }
        Ok(())
    }
}
