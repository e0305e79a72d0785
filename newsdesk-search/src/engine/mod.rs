//! The search engine: matching, fuzzy fallback and relevance ranking.

pub mod executor;
pub mod fuzzy;
pub mod scoring;

pub use executor::{execute, search, search_at, SearchOutcome};
pub use fuzzy::fuzzy_match;
pub use scoring::relevance_score;
