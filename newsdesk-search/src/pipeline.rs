//! Debounced query pipeline between the search input and the executor.
//!
//! Every input change supersedes the previous one: a pending scheduled run
//! is cancelled before a new one is scheduled, so a burst of keystrokes
//! collapses into a single executor run once the input has been quiet for
//! the debounce window. An empty term skips the delay and runs immediately.
//!
//! A scheduled run reads the *live* term and article set when it fires,
//! never values captured at scheduling time. Results are published on a
//! [`tokio::sync::watch`] channel so the latest result set always wins.
//!
//! ```text
//! keystroke ─► cancel pending ─► empty? ──yes──► run now ─► publish
//!                                  │
//!                                  no
//!                                  ▼
//!                       ScheduledTask(100ms) ─► run ─► publish
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::executor;
use crate::types::Article;

/// One published result set.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// The term these results were computed for.
    pub term: String,
    /// Matching articles, best first (or the full set for an empty term).
    pub articles: Vec<Article>,
    /// Number of articles in `articles`.
    pub count: usize,
    /// Executor wall-clock time.
    pub elapsed: Duration,
    /// Whether the "all sources" toggle was on for this run.
    pub include_all_sources: bool,
    /// Executor run number that produced this set; 0 for the initial set.
    pub run: u64,
}

/// A deferred callback that can be invalidated before it fires.
///
/// Dropping the handle cancels it as well.
#[derive(Debug)]
pub struct ScheduledTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `f` after `delay` unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => f(),
            }
        });
        Self { cancel, handle }
    }

    /// Invalidate the task. A no-op if it has already fired.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the task has fired or been cancelled and wound down.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Debug)]
struct LiveQuery {
    term: String,
    articles: Arc<Vec<Article>>,
    include_all_sources: bool,
    /// Bumped on every term change; a scheduled run only executes if the
    /// generation it was scheduled for is still current.
    generation: u64,
}

#[derive(Debug, Clone)]
struct Shared {
    live: Arc<Mutex<LiveQuery>>,
    results: Arc<watch::Sender<SearchResults>>,
    runs: Arc<AtomicU64>,
    config: SearchConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LiveQuery> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Execute against the live state and publish. Holding the lock for the
    /// whole run keeps publication ordered with term updates.
    fn execute_locked(&self, live: &LiveQuery) -> SearchResults {
        let outcome = executor::execute(&live.articles, &live.term, &self.config);
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let results = SearchResults {
            term: live.term.clone(),
            articles: outcome.articles,
            count: outcome.count,
            elapsed: outcome.elapsed,
            include_all_sources: live.include_all_sources,
            run,
        };
        self.results.send_replace(results.clone());
        results
    }

    fn run_current(&self) -> SearchResults {
        let live = self.lock();
        self.execute_locked(&live)
    }

    fn run_if_current(&self, generation: u64) {
        let live = self.lock();
        if live.generation != generation {
            tracing::trace!(generation, current = live.generation, "superseded search skipped");
            return;
        }
        self.execute_locked(&live);
    }
}

/// Debounced search over a live article set.
#[derive(Debug)]
pub struct DebouncedSearch {
    shared: Shared,
    pending: Option<ScheduledTask>,
}

impl DebouncedSearch {
    /// Create a pipeline over `articles`. The initial published result set
    /// is the full collection with an empty term.
    pub fn new(articles: Vec<Article>, config: SearchConfig) -> Self {
        let initial = SearchResults {
            count: articles.len(),
            articles: articles.clone(),
            ..Default::default()
        };
        let (tx, _rx) = watch::channel(initial);
        let live = LiveQuery {
            term: String::new(),
            articles: Arc::new(articles),
            include_all_sources: false,
            generation: 0,
        };

        Self {
            shared: Shared {
                live: Arc::new(Mutex::new(live)),
                results: Arc::new(tx),
                runs: Arc::new(AtomicU64::new(0)),
                config,
            },
            pending: None,
        }
    }

    /// Receive every published result set.
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.shared.results.subscribe()
    }

    /// The most recently published result set.
    pub fn latest(&self) -> SearchResults {
        self.shared.results.borrow().clone()
    }

    /// The live term.
    pub fn term(&self) -> String {
        self.shared.lock().term.clone()
    }

    /// The live article set.
    pub fn articles(&self) -> Arc<Vec<Article>> {
        Arc::clone(&self.shared.lock().articles)
    }

    /// Number of executor runs so far.
    pub fn run_count(&self) -> u64 {
        self.shared.runs.load(Ordering::SeqCst)
    }

    /// Whether a scheduled run is still waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Handle an input change.
    ///
    /// Cancels any pending run. An empty term executes synchronously and the
    /// results are returned; otherwise a run is scheduled after the debounce
    /// window and `None` is returned.
    pub fn input_changed(&mut self, term: &str) -> Option<SearchResults> {
        let generation = self.set_term(term);
        self.cancel_pending();

        if term.trim().is_empty() {
            return Some(self.shared.run_current());
        }

        let shared = self.shared.clone();
        self.pending = Some(ScheduledTask::spawn(self.shared.config.debounce(), move || {
            shared.run_if_current(generation);
        }));
        None
    }

    /// Set the term and execute immediately, bypassing the debounce.
    pub fn run_now(&mut self, term: &str) -> SearchResults {
        self.set_term(term);
        self.cancel_pending();
        self.shared.run_current()
    }

    /// Replace the live article set. A pending run will see the new set.
    pub fn set_articles(&self, articles: Vec<Article>) {
        self.shared.lock().articles = Arc::new(articles);
    }

    /// Flip the "all sources" toggle. With a non-empty term the search is
    /// re-run immediately.
    pub fn set_include_all_sources(&mut self, include: bool) -> Option<SearchResults> {
        let term_is_empty = {
            let mut live = self.shared.lock();
            live.include_all_sources = include;
            live.term.trim().is_empty()
        };
        if term_is_empty {
            return None;
        }
        self.cancel_pending();
        Some(self.shared.run_current())
    }

    /// Current state of the "all sources" toggle.
    pub fn include_all_sources(&self) -> bool {
        self.shared.lock().include_all_sources
    }

    /// Re-run the live term immediately, e.g. after the article set changed.
    pub fn refresh(&mut self) -> SearchResults {
        self.cancel_pending();
        self.shared.run_current()
    }

    fn set_term(&self, term: &str) -> u64 {
        let mut live = self.shared.lock();
        live.term = term.to_string();
        live.generation += 1;
        live.generation
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> Vec<Article> {
        vec![
            Article::new("1", "OpenAI launches GPT-5", "TechCrunch"),
            Article::new("2", "Weather report", "Local News"),
        ]
    }

    fn pipeline() -> DebouncedSearch {
        DebouncedSearch::new(articles(), SearchConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn initial_results_are_full_set() {
        let search = pipeline();
        let latest = search.latest();
        assert_eq!(latest.count, 2);
        assert_eq!(latest.run, 0);
        assert_eq!(search.run_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_term_runs_synchronously() {
        let mut search = pipeline();
        let results = search.input_changed("   ").expect("synchronous run");
        assert_eq!(results.count, 2);
        assert_eq!(search.run_count(), 1);
        assert!(!search.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn non_empty_term_waits_for_debounce() {
        let mut search = pipeline();
        assert!(search.input_changed("gpt").is_none());
        assert_eq!(search.run_count(), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(search.run_count(), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(search.run_count(), 1);
        assert_eq!(search.latest().term, "gpt");
        assert_eq!(search.latest().count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_term() {
        let mut search = pipeline();
        for term in ["g", "gp", "gpt"] {
            search.input_changed(term);
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(search.run_count(), 1);
        assert_eq!(search.latest().term, "gpt");
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_cancels_pending_run() {
        let mut search = pipeline();
        search.input_changed("weather");
        search.input_changed("");
        tokio::time::sleep(Duration::from_millis(200)).await;
        // Only the synchronous empty-term run happened.
        assert_eq!(search.run_count(), 1);
        assert_eq!(search.latest().term, "");
        assert_eq!(search.latest().count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_run_reads_live_articles() {
        let mut search = pipeline();
        search.input_changed("robot");
        search.set_articles(vec![Article::new("9", "Robot chefs", "Wire")]);
        tokio::time::sleep(Duration::from_millis(150)).await;
        let latest = search.latest();
        assert_eq!(latest.count, 1);
        assert_eq!(latest.articles[0].id.as_str(), "9");
    }

    #[tokio::test(start_paused = true)]
    async fn run_now_bypasses_debounce() {
        let mut search = pipeline();
        search.input_changed("wea");
        let results = search.run_now("weather");
        assert_eq!(results.term, "weather");
        assert_eq!(search.run_count(), 1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(search.run_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_reruns_only_with_term() {
        let mut search = pipeline();
        assert!(search.set_include_all_sources(true).is_none());
        assert!(search.include_all_sources());

        search.run_now("gpt");
        let rerun = search.set_include_all_sources(false).expect("rerun");
        assert!(!rerun.include_all_sources);
        assert_eq!(search.run_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_latest() {
        let mut search = pipeline();
        let mut rx = search.subscribe();
        search.input_changed("news");
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().term, "news");
        assert_eq!(rx.borrow().count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_task_cancel_prevents_callback() {
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        let task = ScheduledTask::spawn(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scheduled_task_cancels_it() {
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        drop(ScheduledTask::spawn(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
