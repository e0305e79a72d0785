//! Bounded, persisted list of recent search terms.
//!
//! The list is most-recent-first, deduplicated by exact string match and
//! capped (five entries by default). It is written back synchronously after
//! every update. Storage failures never interrupt searching: they are logged
//! and the list degrades to whatever is held in memory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};

/// Namespace key under which recent searches are persisted.
pub const RECENT_SEARCHES_KEY: &str = "newsdesk_recent_searches";

/// Backing store for the recent-search list.
pub trait RecentStore: Send + Sync + fmt::Debug {
    /// Load the persisted list. A store with nothing saved yet returns an
    /// empty list, not an error.
    fn load(&self) -> Result<Vec<String>>;

    /// Replace the persisted list.
    fn save(&self, entries: &[String]) -> Result<()>;
}

/// Stores the list as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/newsdesk_recent_searches.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{RECENT_SEARCHES_KEY}.json")))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store, shareable between clones. Handy for tests and for
/// sessions that should not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Copy of whatever was last saved.
    pub fn snapshot(&self) -> Vec<String> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RecentStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.snapshot())
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| SearchError::Storage("memory store lock poisoned".into()))?;
        *guard = entries.to_vec();
        Ok(())
    }
}

/// Most-recent-first list of committed search terms.
pub struct RecentSearches {
    entries: Vec<String>,
    capacity: usize,
    min_len: usize,
    store: Box<dyn RecentStore>,
}

impl fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecentSearches")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .field("store", &self.store)
            .finish()
    }
}

impl RecentSearches {
    /// Load the list from `store` once.
    ///
    /// A load failure is logged and treated as "no persisted recent
    /// searches".
    pub fn load(store: Box<dyn RecentStore>, config: &SearchConfig) -> Self {
        let entries = match store.load() {
            Ok(mut entries) => {
                entries.truncate(config.recent_capacity);
                entries
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load recent searches");
                Vec::new()
            }
        };

        Self {
            entries,
            capacity: config.recent_capacity,
            min_len: config.recent_min_len,
            store,
        }
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether `term` is currently remembered.
    pub fn contains(&self, term: &str) -> bool {
        self.entries.iter().any(|entry| entry == term)
    }

    /// Commit `term` to the front of the list and persist.
    ///
    /// Terms shorter than the minimum length after trimming are ignored.
    /// Returns whether the list changed.
    pub fn record(&mut self, term: &str) -> bool {
        if term.trim().chars().count() < self.min_len {
            return false;
        }

        self.entries.retain(|entry| entry != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(self.capacity);
        self.persist();
        true
    }

    /// Forget every entry and persist the empty list.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.entries) {
            tracing::warn!(error = %err, "failed to persist recent searches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct BrokenStore;

    impl RecentStore for BrokenStore {
        fn load(&self) -> Result<Vec<String>> {
            Err(SearchError::Storage("disk on fire".into()))
        }

        fn save(&self, _entries: &[String]) -> Result<()> {
            Err(SearchError::Storage("disk on fire".into()))
        }
    }

    fn recent_with(store: MemoryStore) -> RecentSearches {
        RecentSearches::load(Box::new(store), &SearchConfig::default())
    }

    #[test]
    fn record_puts_term_first() {
        let mut recent = recent_with(MemoryStore::new());
        recent.record("openai");
        recent.record("robotics");
        assert_eq!(recent.entries(), ["robotics", "openai"]);
    }

    #[test]
    fn short_terms_ignored() {
        let mut recent = recent_with(MemoryStore::new());
        assert!(!recent.record("a"));
        assert!(!recent.record(" a  "));
        assert!(recent.entries().is_empty());
        assert!(recent.record("ai"));
    }

    #[test]
    fn duplicate_moves_to_front() {
        let mut recent = recent_with(MemoryStore::new());
        recent.record("one");
        recent.record("two");
        recent.record("one");
        assert_eq!(recent.entries(), ["one", "two"]);
    }

    #[test]
    fn capacity_enforced() {
        let mut recent = recent_with(MemoryStore::new());
        for term in ["t1", "t2", "t3", "t4", "t5", "t6"] {
            recent.record(term);
        }
        assert_eq!(recent.entries(), ["t6", "t5", "t4", "t3", "t2"]);
    }

    #[test]
    fn every_update_is_persisted() {
        let store = MemoryStore::new();
        let mut recent = recent_with(store.clone());
        recent.record("llama");
        assert_eq!(store.snapshot(), vec!["llama".to_string()]);
        recent.clear();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn load_truncates_oversized_list() {
        let store = MemoryStore::with_entries((0..9).map(|i| format!("term{i}")).collect());
        let recent = recent_with(store);
        assert_eq!(recent.entries().len(), 5);
        assert_eq!(recent.entries()[0], "term0");
    }

    #[test]
    fn broken_store_degrades_to_empty() {
        let mut recent = RecentSearches::load(Box::new(BrokenStore), &SearchConfig::default());
        assert!(recent.entries().is_empty());
        // Saving fails too, but the in-memory list still updates.
        assert!(recent.record("still works"));
        assert_eq!(recent.entries(), ["still works"]);
    }

    #[test]
    fn json_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn json_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::in_dir(&dir.path().join("nested"));
        store
            .save(&["gpt".to_string(), "robots".to_string()])
            .expect("save");
        assert!(store.path().ends_with("newsdesk_recent_searches.json"));
        assert_eq!(store.load().expect("load"), ["gpt", "robots"]);
    }

    #[test]
    fn json_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not an array").expect("write");
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("invalid recent-search data"));
    }

    #[test]
    fn corrupt_file_degrades_to_empty_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.path(), "[1, 2").expect("write");
        let recent = RecentSearches::load(Box::new(store), &SearchConfig::default());
        assert!(recent.entries().is_empty());
    }
}
