//! Filter and rank an in-memory article collection against a query term.
//!
//! # Pipeline
//!
//! 1. Empty or whitespace-only term: return the input unchanged (reset path)
//! 2. Lowercase the term once
//! 3. Keep articles matching title → source → body → tags → fuzzy title word
//! 4. Stable sort by descending relevance score
//! 5. Log result count and elapsed time

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::config::SearchConfig;
use crate::types::Article;

use super::fuzzy::fuzzy_match;
use super::scoring::relevance_score;

/// Result of a single executor run.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Matching articles, best first.
    pub articles: Vec<Article>,
    /// Number of matching articles.
    pub count: usize,
    /// Wall-clock time spent filtering and sorting.
    pub elapsed: Duration,
}

/// Search `articles` for `term` with the default configuration.
///
/// Returns clones of the matching articles ordered by descending
/// relevance; ties keep their input order.
pub fn search(articles: &[Article], term: &str) -> Vec<Article> {
    execute(articles, term, &SearchConfig::default()).articles
}

/// Run a search and report timing alongside the results.
pub fn execute(articles: &[Article], term: &str, config: &SearchConfig) -> SearchOutcome {
    let started = Instant::now();
    let results = search_at(articles, term, Utc::now(), config);
    let elapsed = started.elapsed();
    let count = results.len();

    tracing::trace!(term, "search term");
    tracing::debug!(
        count,
        elapsed_us = elapsed.as_micros() as u64,
        "search completed"
    );

    SearchOutcome {
        articles: results,
        count,
        elapsed,
    }
}

/// Search as of a fixed instant. `now` only affects the recency bonus.
pub fn search_at(
    articles: &[Article],
    term: &str,
    now: DateTime<Utc>,
    config: &SearchConfig,
) -> Vec<Article> {
    if term.trim().is_empty() {
        return articles.to_vec();
    }

    let term = term.to_lowercase();

    let mut scored: Vec<(i64, &Article)> = articles
        .iter()
        .filter(|article| matches(article, &term, config))
        .map(|article| (relevance_score(article, &term, now), article))
        .collect();

    // `sort_by` is stable, so equal scores keep input order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().map(|(_, article)| article.clone()).collect()
}

/// Whether `article` matches the already-lowercased `term`.
///
/// Checks short-circuit in order of expected relevance and cost.
pub fn matches(article: &Article, term: &str, config: &SearchConfig) -> bool {
    let title = article.title.to_lowercase();
    if title.contains(term) {
        return true;
    }

    if article.source.to_lowercase().contains(term) {
        return true;
    }

    if article
        .body()
        .is_some_and(|body| body.to_lowercase().contains(term))
    {
        return true;
    }

    if article
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(term))
    {
        return true;
    }

    if term.chars().count() >= config.fuzzy_min_term_len {
        return title.split(' ').any(|word| {
            word.chars().count() >= config.fuzzy_min_term_len
                && fuzzy_match(word, term, config.fuzzy_max_distance)
        });
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid date")
    }

    fn make_article(id: &str, title: &str, source: &str) -> Article {
        Article::new(id, title, source)
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn empty_term_returns_input_unchanged() {
        let articles = vec![
            make_article("b", "Second", "X"),
            make_article("a", "First", "Y"),
        ];
        let results = search_at(&articles, "", now(), &SearchConfig::default());
        assert_eq!(results, articles);
    }

    #[test]
    fn whitespace_term_is_the_reset_path() {
        let articles = vec![make_article("a", "Only", "Z")];
        let results = search_at(&articles, "   ", now(), &SearchConfig::default());
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn term_is_case_insensitive() {
        let articles = vec![make_article("a", "OpenAI launches GPT-5", "TechCrunch")];
        let results = search_at(&articles, "GPT", now(), &SearchConfig::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn content_match_includes_article() {
        let mut article = make_article("a", "Quarterly results", "Wire");
        article.content = Some("The transformer architecture again".into());
        let results = search_at(&[article], "transformer", now(), &SearchConfig::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn summary_used_when_content_missing() {
        let mut article = make_article("a", "Quarterly results", "Wire");
        article.summary = Some("diffusion models everywhere".into());
        let results = search_at(&[article], "diffusion", now(), &SearchConfig::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn tag_match_includes_article() {
        let mut article = make_article("a", "Quarterly results", "Wire");
        article.tags = vec!["Robotics".into()];
        let results = search_at(&[article], "robot", now(), &SearchConfig::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn fuzzy_title_word_fallback() {
        let articles = vec![make_article("a", "New gpt4 benchmark", "Lab")];
        let results = search_at(&articles, "gpt5", now(), &SearchConfig::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn fuzzy_fallback_needs_three_char_term() {
        // "ax" vs title word "ai": one substitution, but the term is too short.
        let articles = vec![make_article("a", "ai rules", "Lab")];
        let results = search_at(&articles, "ax", now(), &SearchConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn fuzzy_fallback_skips_short_title_words() {
        // "abc" is within distance 1 of "ab", but "ab" is under three chars.
        let articles = vec![make_article("a", "ab cd", "Lab")];
        let results = search_at(&articles, "abc", now(), &SearchConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn results_sorted_by_descending_score() {
        let articles = vec![
            make_article("interior", "The new model ships", "Wire"),
            make_article("prefix", "Model wars", "Wire"),
            make_article("source", "Unrelated headline", "Model Digest"),
        ];
        let results = search_at(&articles, "model", now(), &SearchConfig::default());
        assert_eq!(ids(&results), vec!["prefix", "interior", "source"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let articles = vec![
            make_article("first", "Robots at work", "A"),
            make_article("second", "Robots at play", "B"),
            make_article("third", "Robots at rest", "C"),
        ];
        let results = search_at(&articles, "robots", now(), &SearchConfig::default());
        assert_eq!(ids(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn recency_breaks_otherwise_equal_scores() {
        let old = make_article("old", "Chip news", "A");
        let mut fresh = make_article("fresh", "Chip news", "A");
        fresh.publication_date = Some(now() - ChronoDuration::hours(1));
        let results = search_at(&[old, fresh], "chip", now(), &SearchConfig::default());
        assert_eq!(ids(&results), vec!["fresh", "old"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let articles = vec![
            make_article("a", "beta", "x"),
            make_article("b", "alpha beta", "x"),
        ];
        let before = articles.clone();
        let _ = search_at(&articles, "beta", now(), &SearchConfig::default());
        assert_eq!(articles, before);
    }

    #[test]
    fn execute_reports_count() {
        let articles = vec![
            make_article("a", "alpha", "x"),
            make_article("b", "beta", "x"),
        ];
        let outcome = execute(&articles, "alpha", &SearchConfig::default());
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.articles.len(), 1);
    }

    #[test]
    fn search_uses_default_config() {
        let articles = vec![make_article("a", "gpt4 lands", "x")];
        assert_eq!(search(&articles, "gpt5").len(), 1);
    }
}
