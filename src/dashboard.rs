//! Dashboard state: the article feed, search bar, category filter, paging,
//! the per-article "generate" menu and drafted posts.
//!
//! Widgets own explicit state machines ([`SuggestionState`] in the search
//! bar, [`ContentMenu`] here). Pointer events enter through a single router,
//! [`Dashboard::pointer_down`], which closes whichever widget the pointer
//! landed outside of.
//!
//! # Refresh ordering
//!
//! Each refresh takes a [`RefreshTicket`]. Results are applied in the order
//! they arrive, not the order they were requested: a slow, older refresh
//! that lands after a newer one still replaces the article list. This is
//! logged at `warn` with both sequence numbers.
//!
//! [`SuggestionState`]: newsdesk_search::SuggestionState

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use newsdesk_search::collection::{filter_by_categories, page_count, paginate, DEFAULT_PAGE_SIZE};
use newsdesk_search::{Article, ArticleId, PointerHit, SearchBar};

use crate::backend::generate::{ContentGenerator, GeneratedPost, Platform};
use crate::backend::news::{ArticleStats, NewsBatch, NewsSource};
use crate::error::Result;

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    News,
    Content,
    History,
    ApiStatus,
    Settings,
}

/// The per-article platform menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentMenu {
    #[default]
    Closed,
    /// Open under the given article.
    Open(ArticleId),
}

/// Where a pointer-down landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// The search text input.
    SearchInput,
    /// The search suggestion panel.
    SuggestionPanel,
    /// An article's generate button or its open menu.
    ContentMenu(ArticleId),
    /// Anywhere else.
    Elsewhere,
}

/// Sequence number handed out when a refresh starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// The sequence number.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A draft in flight, from [`Dashboard::begin_generate`].
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Article being drafted from.
    pub article: ArticleId,
    /// Target platform.
    pub platform: Platform,
    /// The article itself, when it is in the current feed.
    pub inline: Option<Article>,
}

impl GenerateRequest {
    /// Ask `generator` for the draft.
    ///
    /// # Errors
    ///
    /// Returns the generator's error.
    pub async fn run(&self, generator: &dyn ContentGenerator) -> Result<GeneratedPost> {
        generator
            .generate(&self.article, self.platform, self.inline.as_ref())
            .await
    }
}

/// Top-level dashboard state.
#[derive(Debug)]
pub struct Dashboard {
    articles: Vec<Article>,
    stats: Option<ArticleStats>,
    search: SearchBar,
    selected_categories: Vec<u32>,
    page: usize,
    per_page: usize,
    tab: Tab,
    menu: ContentMenu,
    generating: HashSet<(ArticleId, Platform)>,
    generated: HashMap<(ArticleId, Platform), GeneratedPost>,
    issued: u64,
    applied: u64,
    last_error: Option<String>,
}

impl Dashboard {
    /// Dashboard around `search`, with an empty feed.
    pub fn new(search: SearchBar) -> Self {
        Self {
            articles: Vec::new(),
            stats: None,
            search,
            selected_categories: Vec::new(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            tab: Tab::default(),
            menu: ContentMenu::default(),
            generating: HashSet::new(),
            generated: HashMap::new(),
            issued: 0,
            applied: 0,
            last_error: None,
        }
    }

    /// The full, unfiltered article list.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Statistics of the last successful refresh.
    pub fn stats(&self) -> Option<&ArticleStats> {
        self.stats.as_ref()
    }

    /// Message of the last failed operation, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The search bar.
    pub fn search(&self) -> &SearchBar {
        &self.search
    }

    /// Mutable access to the search bar for input and key events.
    pub fn search_mut(&mut self) -> &mut SearchBar {
        &mut self.search
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Start a refresh and get its ticket.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Apply the outcome of the refresh holding `ticket`.
    ///
    /// On success the article list, statistics and search set are replaced
    /// and paging resets. On failure the article list is cleared and the
    /// error returned.
    ///
    /// # Errors
    ///
    /// Returns `outcome`'s error unchanged.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, outcome: Result<NewsBatch>) -> Result<()> {
        if ticket.0 < self.applied {
            tracing::warn!(
                ticket = ticket.0,
                applied = self.applied,
                "stale refresh is overwriting newer articles"
            );
        }
        self.applied = self.applied.max(ticket.0);

        match outcome {
            Ok(batch) => {
                self.articles = batch.articles;
                self.stats = Some(batch.stats);
                self.last_error = None;
                self.search.set_articles(self.articles.clone());
                self.page = 1;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, ticket = ticket.0, "refresh failed");
                self.articles.clear();
                self.stats = None;
                self.last_error = Some(err.to_string());
                self.search.set_articles(Vec::new());
                self.page = 1;
                Err(err)
            }
        }
    }

    /// Fetch from `source` and apply the result.
    ///
    /// # Errors
    ///
    /// Returns the refresh error after clearing the article list.
    pub async fn refresh(&mut self, source: &dyn NewsSource) -> Result<()> {
        let ticket = self.begin_refresh();
        let outcome = source.refresh().await;
        self.apply_refresh(ticket, outcome)
    }

    // ── Feed view ───────────────────────────────────────────────────

    /// Search results narrowed by the category selection.
    pub fn visible_articles(&self) -> Vec<Article> {
        filter_by_categories(&self.search.results().articles, &self.selected_categories)
    }

    /// The current page of [`Self::visible_articles`].
    pub fn page_articles(&self) -> Vec<Article> {
        paginate(&self.visible_articles(), self.page, self.per_page).to_vec()
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages of visible articles.
    pub fn page_count(&self) -> usize {
        page_count(self.visible_articles().len(), self.per_page)
    }

    /// Jump to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count().max(1));
    }

    /// Change the page size. Paging restarts from page 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Select or deselect a category. Paging restarts from page 1.
    pub fn toggle_category(&mut self, id: u32) {
        if let Some(pos) = self.selected_categories.iter().position(|c| *c == id) {
            self.selected_categories.remove(pos);
        } else {
            self.selected_categories.push(id);
        }
        self.page = 1;
    }

    /// Selected category ids, in selection order.
    pub fn selected_categories(&self) -> &[u32] {
        &self.selected_categories
    }

    /// Current tab.
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switch tab.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // ── Content menu & pointer routing ──────────────────────────────

    /// State of the generate menu.
    pub fn content_menu(&self) -> &ContentMenu {
        &self.menu
    }

    /// The generate button for `article` was clicked: open its menu, or
    /// close it if it was already open.
    pub fn toggle_content_menu(&mut self, article: &ArticleId) {
        self.menu = match &self.menu {
            ContentMenu::Open(open) if open == article => ContentMenu::Closed,
            _ => ContentMenu::Open(article.clone()),
        };
    }

    /// Route a pointer-down to every widget it may close.
    pub fn pointer_down(&mut self, target: &PointerTarget) {
        let search_hit = match target {
            PointerTarget::SearchInput => PointerHit::Input,
            PointerTarget::SuggestionPanel => PointerHit::SuggestionPanel,
            PointerTarget::ContentMenu(_) | PointerTarget::Elsewhere => PointerHit::Outside,
        };
        self.search.pointer_down(search_hit);

        let inside_open_menu = matches!(
            (&self.menu, target),
            (ContentMenu::Open(open), PointerTarget::ContentMenu(hit)) if open == hit
        );
        if !inside_open_menu {
            self.menu = ContentMenu::Closed;
        }
    }

    // ── Post generation ─────────────────────────────────────────────

    /// Whether a draft for `article` on `platform` is in flight.
    pub fn is_generating(&self, article: &ArticleId, platform: Platform) -> bool {
        self.generating.contains(&(article.clone(), platform))
    }

    /// Start drafting a post for `article` on `platform`.
    ///
    /// Closes the menu and marks the draft in flight until
    /// [`Self::apply_generate`] receives its outcome. The returned request
    /// carries a copy of the in-memory article when present.
    pub fn begin_generate(&mut self, article: &ArticleId, platform: Platform) -> GenerateRequest {
        self.menu = ContentMenu::Closed;
        self.generating.insert((article.clone(), platform));
        GenerateRequest {
            article: article.clone(),
            platform,
            inline: self.articles.iter().find(|a| &a.id == article).cloned(),
        }
    }

    /// Finish the draft started by `request`.
    ///
    /// On success the draft is stored and the content tab shown.
    ///
    /// # Errors
    ///
    /// Returns `outcome`'s error; the in-flight marker is cleared either way.
    pub fn apply_generate(
        &mut self,
        request: GenerateRequest,
        outcome: Result<GeneratedPost>,
    ) -> Result<&GeneratedPost> {
        let key = (request.article, request.platform);
        self.generating.remove(&key);

        match outcome {
            Ok(post) => {
                self.last_error = None;
                self.tab = Tab::Content;
                let slot = match self.generated.entry(key) {
                    Entry::Occupied(mut entry) => {
                        entry.insert(post);
                        entry.into_mut()
                    }
                    Entry::Vacant(entry) => entry.insert(post),
                };
                Ok(&*slot)
            }
            Err(err) => {
                tracing::warn!(error = %err, story = %key.0, platform = %key.1, "post generation failed");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Draft a post with `generator`: [`Self::begin_generate`], the call,
    /// then [`Self::apply_generate`].
    ///
    /// # Errors
    ///
    /// Returns the generator's error.
    pub async fn generate(
        &mut self,
        generator: &dyn ContentGenerator,
        article: &ArticleId,
        platform: Platform,
    ) -> Result<&GeneratedPost> {
        let request = self.begin_generate(article, platform);
        let outcome = request.run(generator).await;
        self.apply_generate(request, outcome)
    }

    /// A stored draft.
    pub fn generated_post(&self, article: &ArticleId, platform: Platform) -> Option<&GeneratedPost> {
        self.generated.get(&(article.clone(), platform))
    }

    /// All drafts from this session.
    pub fn generated_posts(&self) -> impl Iterator<Item = &GeneratedPost> {
        self.generated.values()
    }
}
