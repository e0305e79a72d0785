//! Behavioural properties of the search engine, exercised through the
//! public API only.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use newsdesk_search::engine::{fuzzy_match, relevance_score, search_at};
use newsdesk_search::recent::RecentSearches;
use newsdesk_search::suggest::MAX_SUGGESTIONS;
use newsdesk_search::{search, suggest, Article, DebouncedSearch, MemoryStore, SearchConfig};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
        .single()
        .expect("valid date")
}

fn feed() -> Vec<Article> {
    let mut gpt = Article::new("1", "OpenAI launches GPT-5", "TechCrunch");
    gpt.tags = vec!["ai".into()];
    let weather = Article::new("2", "Weather report", "Local News");
    vec![gpt, weather]
}

fn ids(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.id.as_str()).collect()
}

#[test]
fn empty_query_returns_input_in_order() {
    assert!(search(&[], "").is_empty());

    let mut articles = feed();
    articles.reverse();
    assert_eq!(search(&articles, ""), articles);
}

#[test]
fn results_are_ordered_by_descending_score() {
    let mut recent = Article::new("r", "Chips and more chips", "Wire");
    recent.publication_date = Some(now() - chrono::Duration::hours(2));
    let mut credible = Article::new("c", "Old chips story", "Chips Weekly");
    credible.credibility_score = 97.0;
    let articles = vec![
        Article::new("t", "The chip shortage", "Wire"),
        recent,
        credible,
        Article::new("s", "Unrelated", "Chip Digest"),
    ];

    let config = SearchConfig::default();
    let results = search_at(&articles, "chip", now(), &config);
    assert_eq!(results.len(), 4);

    let scores: Vec<i64> = results
        .iter()
        .map(|a| relevance_score(a, "chip", now()))
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]), "{scores:?}");
}

#[test]
fn prefix_beats_interior_substring() {
    let articles = vec![
        Article::new("interior", "Why robots matter", "Wire"),
        Article::new("prefix", "Robots take over", "Wire"),
    ];
    let results = search(&articles, "robots");
    assert_eq!(ids(&results), ["prefix", "interior"]);
}

#[test]
fn recent_searches_capped_at_five() {
    let store = MemoryStore::new();
    let mut recent = RecentSearches::load(Box::new(store.clone()), &SearchConfig::default());
    for term in ["llama", "mistral", "gemini", "claude", "grok", "qwen"] {
        recent.record(term);
    }

    let persisted = store.snapshot();
    assert_eq!(persisted, ["qwen", "grok", "claude", "gemini", "mistral"]);
}

#[test]
fn fuzzy_match_boundary() {
    assert!(fuzzy_match("gpt4", "gpt5", 1));
    assert!(fuzzy_match("gpt4", "gpt44", 1));
    assert!(!fuzzy_match("gpt4", "gpt444", 1));
}

#[tokio::test(start_paused = true)]
async fn keystroke_burst_runs_executor_once() {
    let mut pipeline = DebouncedSearch::new(feed(), SearchConfig::default());
    for term in ["o", "op", "ope", "open"] {
        assert!(pipeline.input_changed(term).is_none());
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(pipeline.run_count(), 1);
    let latest = pipeline.latest();
    assert_eq!(latest.term, "open");
    assert_eq!(ids(&latest.articles), ["1"]);
}

#[test]
fn suggestions_never_exceed_six() {
    let big_history: Vec<String> = (0..50).map(|i| format!("ai topic {i}")).collect();
    for partial in ["", " ", "a", "ai", "#", "learning", "zzz"] {
        assert!(suggest(partial, &big_history).len() <= MAX_SUGGESTIONS);
    }
}

#[test]
fn end_to_end_scenario() {
    let articles = feed();
    assert_eq!(ids(&search(&articles, "gpt")), ["1"]);
    assert_eq!(ids(&search(&articles, "news")), ["2"]);
    assert!(search(&articles, "xyz").is_empty());
}
