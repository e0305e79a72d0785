//! Operations over a whole article collection: multi-source
//! de-duplication, category filtering and paging.

pub mod dedup;
pub mod filter;
pub mod url_normalize;

pub use dedup::{dedup, dedup_articles, DeduplicatedArticle};
pub use filter::{filter_by_categories, page_count, paginate, DEFAULT_PAGE_SIZE};
pub use url_normalize::normalize_url;
