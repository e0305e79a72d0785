//! # newsdesk-search
//!
//! Instant, in-memory search over the newsdesk article feed.
//!
//! This crate filters and ranks an already-loaded article collection as the
//! user types. It performs no network I/O: the article set is handed in by
//! the caller and replaced wholesale whenever the feed refreshes.
//!
//! ## Design
//!
//! - Keystrokes feed a debounced pipeline; only the last term in a burst runs
//! - Matching checks title, source, body and tags, then a fuzzy title-word
//!   fallback for near-miss typos
//! - Results are ranked by an additive relevance score, ties keep feed order
//! - Suggestions mix recent searches, trending topics and common hashtags
//! - Recent searches persist through a pluggable [`RecentStore`]
//! - Multi-source feeds are de-duplicated by normalised URL before search
//!
//! ## Privacy
//!
//! - Search terms are logged only at trace level

pub mod collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod recent;
pub mod search_bar;
pub mod suggest;
pub mod types;

pub use config::SearchConfig;
pub use engine::{search, SearchOutcome};
pub use error::{Result, SearchError};
pub use pipeline::{DebouncedSearch, ScheduledTask, SearchResults};
pub use recent::{JsonFileStore, MemoryStore, RecentSearches, RecentStore};
pub use search_bar::{Key, PointerHit, SearchBar, SuggestionState};
pub use suggest::{suggest, SuggestionKind};
pub use types::{Article, ArticleId};
