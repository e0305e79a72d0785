//! The search bar widget: input, suggestion list and keyboard navigation.
//!
//! Ties the [`DebouncedSearch`] pipeline, the [`RecentSearches`] list and
//! the suggestion generator together behind an explicit state machine.
//!
//! # Suggestion list state machine
//!
//! ```text
//!            focus / typing / shortcut
//! ┌────────┐ ───────────────────────────► ┌──────────────────────┐
//! │ Closed │                              │ Open { selected: None}│
//! └───▲────┘ ◄─────────────────────────── └──────────┬───────────┘
//!     │       Escape / pointer outside /             │ ArrowDown / ArrowUp
//!     │       Enter / suggestion chosen              ▼
//!     │                                   ┌──────────────────────────┐
//!     └────────────────────────────────── │ Open { selected: Some(i)}│
//!                                         └──────────────────────────┘
//! ```
//!
//! Navigation keys are ignored while the list is closed, empty, or the
//! input is not focused.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::pipeline::{DebouncedSearch, SearchResults};
use crate::recent::{RecentSearches, RecentStore};
use crate::suggest::{classify, suggest_with_limit, SuggestionKind};
use crate::types::Article;

/// Visibility and selection of the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionState {
    /// List hidden.
    Closed,
    /// List shown, optionally with a highlighted entry.
    Open {
        /// Index of the highlighted suggestion.
        selected: Option<usize>,
    },
}

/// Keys the search bar reacts to while its input is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Where a pointer-down landed, relative to the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    /// The text input.
    Input,
    /// The open suggestion panel.
    SuggestionPanel,
    /// Anywhere else.
    Outside,
}

/// Search input with debounced results and a suggestion dropdown.
#[derive(Debug)]
pub struct SearchBar {
    pipeline: DebouncedSearch,
    recent: RecentSearches,
    suggestions: Vec<String>,
    state: SuggestionState,
    focused: bool,
    config: SearchConfig,
}

impl SearchBar {
    /// Build a search bar over `articles`, loading recent searches from
    /// `store` once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Config`] if `config` is invalid.
    pub fn new(
        articles: Vec<Article>,
        store: Box<dyn RecentStore>,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        let recent = RecentSearches::load(store, &config);
        Ok(Self {
            pipeline: DebouncedSearch::new(articles, config.clone()),
            recent,
            suggestions: Vec::new(),
            state: SuggestionState::Closed,
            focused: false,
            config,
        })
    }

    /// The live input text.
    pub fn term(&self) -> String {
        self.pipeline.term()
    }

    /// Current suggestion entries.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Icon category for a suggestion.
    pub fn suggestion_kind(&self, suggestion: &str) -> SuggestionKind {
        classify(suggestion, self.recent.entries())
    }

    /// Current state of the suggestion list.
    pub fn state(&self) -> SuggestionState {
        self.state
    }

    /// Highlighted suggestion index, if any.
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            SuggestionState::Open { selected } => selected,
            SuggestionState::Closed => None,
        }
    }

    /// Whether the dropdown is actually visible (open and non-empty).
    pub fn is_showing_suggestions(&self) -> bool {
        matches!(self.state, SuggestionState::Open { .. }) && !self.suggestions.is_empty()
    }

    /// Whether the input has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Remembered recent searches, most recent first.
    pub fn recent_searches(&self) -> &[String] {
        self.recent.entries()
    }

    /// Latest published result set.
    pub fn results(&self) -> SearchResults {
        self.pipeline.latest()
    }

    /// The underlying pipeline, for subscribing to results.
    pub fn pipeline(&self) -> &DebouncedSearch {
        &self.pipeline
    }

    /// Swap in a new article snapshot and re-run the live term against it.
    pub fn set_articles(&mut self, articles: Vec<Article>) -> SearchResults {
        self.pipeline.set_articles(articles);
        self.pipeline.refresh()
    }

    /// Input gained focus: open the list with fresh suggestions.
    pub fn focus(&mut self) {
        self.focused = true;
        self.regenerate(&self.term());
        self.state = SuggestionState::Open { selected: None };
    }

    /// The user typed. Returns results when they were produced synchronously
    /// (empty input); otherwise results arrive after the debounce window.
    pub fn input(&mut self, value: &str) -> Option<SearchResults> {
        self.focused = true;
        self.regenerate(value);
        self.state = SuggestionState::Open { selected: None };
        self.pipeline.input_changed(value)
    }

    /// Handle a key press. Returns results when the key committed a search.
    pub fn key(&mut self, key: Key) -> Option<SearchResults> {
        if !self.focused || !self.is_showing_suggestions() {
            return None;
        }
        let count = self.suggestions.len();
        let current = self.selected();

        match key {
            Key::ArrowDown => {
                let next = match current {
                    Some(i) if i + 1 < count => i + 1,
                    _ => 0,
                };
                self.state = SuggestionState::Open {
                    selected: Some(next),
                };
                None
            }
            Key::ArrowUp => {
                let next = match current {
                    Some(i) if i > 0 => i - 1,
                    _ => count - 1,
                };
                self.state = SuggestionState::Open {
                    selected: Some(next),
                };
                None
            }
            Key::Enter => {
                if let Some(index) = current {
                    return self.select_suggestion(index);
                }
                let term = self.term();
                if !term.trim().is_empty() {
                    self.recent.record(&term);
                    self.state = SuggestionState::Closed;
                }
                None
            }
            Key::Escape => {
                self.state = SuggestionState::Closed;
                None
            }
        }
    }

    /// Commit the suggestion at `index`, if it exists.
    pub fn select_suggestion(&mut self, index: usize) -> Option<SearchResults> {
        let suggestion = self.suggestions.get(index)?.clone();
        Some(self.choose(&suggestion))
    }

    /// Commit `suggestion` as the active term: remember it, close the list
    /// and search immediately.
    pub fn choose(&mut self, suggestion: &str) -> SearchResults {
        self.recent.record(suggestion);
        self.state = SuggestionState::Closed;
        self.pipeline.run_now(suggestion)
    }

    /// Route a pointer-down. Anything outside the input and the panel
    /// closes the list.
    pub fn pointer_down(&mut self, hit: PointerHit) {
        match hit {
            PointerHit::Input => self.focus(),
            PointerHit::SuggestionPanel => {}
            PointerHit::Outside => {
                self.focused = false;
                self.state = SuggestionState::Closed;
            }
        }
    }

    /// The global focus shortcut (Ctrl/Cmd+K): focus the input and
    /// force-open the list from any state.
    pub fn global_shortcut(&mut self) {
        self.focused = true;
        self.regenerate(&self.term());
        if self.state == SuggestionState::Closed {
            self.state = SuggestionState::Open { selected: None };
        }
    }

    /// Clear the input, restore the full article list and close the list.
    pub fn clear(&mut self) -> SearchResults {
        self.state = SuggestionState::Closed;
        self.focused = true;
        self.pipeline.run_now("")
    }

    /// Flip the "all sources" toggle.
    pub fn toggle_all_sources(&mut self) -> Option<SearchResults> {
        let next = !self.pipeline.include_all_sources();
        self.pipeline.set_include_all_sources(next)
    }

    /// Whether the "all sources" toggle is on.
    pub fn includes_all_sources(&self) -> bool {
        self.pipeline.include_all_sources()
    }

    fn regenerate(&mut self, input: &str) {
        self.suggestions =
            suggest_with_limit(input, self.recent.entries(), self.config.suggestion_limit);
    }
}
