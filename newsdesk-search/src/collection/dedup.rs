//! Merge duplicate stories delivered by several upstream news APIs.
//!
//! Articles are grouped by normalised URL, falling back to the lowercased
//! title when an article has no URL. Within a group the copy with the
//! highest credibility score is kept and every contributing `api_source` is
//! recorded. Unlike a plain hash-map grouping, output order follows the
//! first appearance of each story so the feed stays stable across
//! refreshes.

use std::collections::HashMap;

use crate::types::Article;

use super::url_normalize::normalize_url;

/// An article after de-duplication, with the upstream APIs that carried it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeduplicatedArticle {
    /// The most credible copy of the story.
    pub article: Article,
    /// Every distinct `api_source` that returned the story, in order seen.
    pub api_sources: Vec<String>,
}

/// De-duplicate `articles`, keeping the most credible copy of each story.
pub fn dedup(articles: Vec<Article>) -> Vec<DeduplicatedArticle> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<DeduplicatedArticle> = Vec::new();

    for article in articles {
        let key = dedup_key(&article);
        let source = article.api_source.clone();

        match slots.get(&key) {
            Some(&index) => {
                let entry = &mut out[index];
                if let Some(source) = source {
                    if !entry.api_sources.contains(&source) {
                        entry.api_sources.push(source);
                    }
                }
                if article.credibility_score > entry.article.credibility_score {
                    entry.article = article;
                }
            }
            None => {
                slots.insert(key, out.len());
                out.push(DeduplicatedArticle {
                    article,
                    api_sources: source.into_iter().collect(),
                });
            }
        }
    }

    tracing::debug!(unique = out.len(), "articles de-duplicated");
    out
}

/// [`dedup`], discarding the source bookkeeping.
pub fn dedup_articles(articles: Vec<Article>) -> Vec<Article> {
    dedup(articles).into_iter().map(|d| d.article).collect()
}

fn dedup_key(article: &Article) -> String {
    match article.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => format!("url:{}", normalize_url(url)),
        _ => format!("title:{}", article.title.trim().to_lowercase()),
    }
}
