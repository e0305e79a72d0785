//! Newsdesk: an AI news desk.
//!
//! Pulls AI-news articles from a hosted aggregation function, merges the
//! per-API duplicates, and lets a signed-in user search the feed instantly
//! and draft social posts for any article.
//!
//! # Architecture
//!
//! - **Search** (`newsdesk-search`): debounced in-memory search, suggestions
//!   and recent searches over the loaded article set
//! - **Backend**: remote function and REST client ([`backend`]), with news
//!   refresh, post generation, categories and preferences on top
//! - **Session**: password-grant auth with an injected [`session::SessionStore`]
//! - **Dashboard**: feed, filters, paging and widget state ([`dashboard`])

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod desk_dirs;
pub mod error;
pub mod logging;
pub mod session;

pub use backend::generate::{GeneratedPost, GenerationService, Platform};
pub use backend::news::{ArticleStats, NewsBatch, NewsService};
pub use backend::BackendClient;
pub use config::DeskConfig;
pub use dashboard::Dashboard;
pub use error::{DeskError, Result};
pub use session::{AuthClient, Session, SessionProvider, SessionStore};

pub use newsdesk_search;
