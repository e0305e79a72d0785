//! Fresh articles from the premium news aggregator function.
//!
//! # Pipeline
//!
//! ```text
//! invoke premium-ai-news-aggregator
//!   → unwrap {data: {articles, articleCount, ...}}
//!   → de-duplicate across upstream APIs (normalised URL, title fallback)
//!   → NewsBatch { articles, stats }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use newsdesk_search::collection::dedup;
use newsdesk_search::Article;

use super::BackendClient;
use crate::error::Result;

/// Name of the aggregation function.
pub const AGGREGATOR_FUNCTION: &str = "premium-ai-news-aggregator";

/// Request body for the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    /// Ask for premium sources as well as the free APIs.
    pub premium_mode: bool,
    /// Caller tag recorded by the function.
    pub source: String,
}

impl Default for RefreshRequest {
    fn default() -> Self {
        Self {
            premium_mode: true,
            source: "dashboard_refresh".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregatorPayload {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    article_count: Option<usize>,
    #[serde(default)]
    fetch_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    working_apis: Vec<String>,
    #[serde(default)]
    api_results: BTreeMap<String, u64>,
    #[serde(default)]
    premium_sources: u64,
}

/// Summary of one refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleStats {
    /// Article count reported by the aggregator (before de-duplication).
    pub total: usize,
    /// Articles left after de-duplication.
    pub unique: usize,
    /// Upstream APIs that answered.
    pub working_apis: Vec<String>,
    /// Articles returned per upstream API.
    pub api_results: BTreeMap<String, u64>,
    /// Number of premium publishers in the batch.
    pub premium_sources: u64,
    /// When the aggregator fetched the batch.
    pub fetch_timestamp: Option<DateTime<Utc>>,
}

/// One refreshed, de-duplicated article set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsBatch {
    /// Articles in aggregator order, one per story.
    pub articles: Vec<Article>,
    /// Refresh statistics.
    pub stats: ArticleStats,
}

/// Anything that can produce a fresh article batch.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch a fresh batch. No retry.
    async fn refresh(&self) -> Result<NewsBatch>;
}

/// [`NewsSource`] backed by the aggregator function.
#[derive(Debug, Clone)]
pub struct NewsService {
    client: BackendClient,
    request: RefreshRequest,
}

impl NewsService {
    /// Service using the default dashboard request.
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            request: RefreshRequest::default(),
        }
    }

    /// Override the request body.
    pub fn with_request(mut self, request: RefreshRequest) -> Self {
        self.request = request;
        self
    }
}

#[async_trait]
impl NewsSource for NewsService {
    async fn refresh(&self) -> Result<NewsBatch> {
        let payload: AggregatorPayload = self
            .client
            .invoke(AGGREGATOR_FUNCTION, &self.request)
            .await?;
        let batch = into_batch(payload);
        tracing::info!(
            total = batch.stats.total,
            unique = batch.stats.unique,
            apis = batch.stats.working_apis.len(),
            "news refreshed"
        );
        Ok(batch)
    }
}

fn into_batch(payload: AggregatorPayload) -> NewsBatch {
    let received = payload.articles.len();
    let articles: Vec<Article> = dedup(payload.articles)
        .into_iter()
        .map(|merged| merged.article)
        .collect();

    NewsBatch {
        stats: ArticleStats {
            total: payload.article_count.unwrap_or(received),
            unique: articles.len(),
            working_apis: payload.working_apis,
            api_results: payload.api_results,
            premium_sources: payload.premium_sources,
            fetch_timestamp: payload.fetch_timestamp,
        },
        articles,
    }
}
