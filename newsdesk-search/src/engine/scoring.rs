//! Additive relevance scoring for matched articles.
//!
//! Assigns an integer score from independent conditions:
//! - Title prefix match (+20), otherwise title substring match (+15)
//! - Source name substring match (+10)
//! - Published within the last 24 hours (+5)
//! - Credibility above 90 (+3)
//!
//! The score is only ever used as a sort key and is never shown to users.

use chrono::{DateTime, Duration, Utc};

use crate::types::Article;

/// Bonus when the title starts with the term.
pub const TITLE_PREFIX_BONUS: i64 = 20;
/// Bonus when the title contains the term anywhere but the start.
pub const TITLE_SUBSTRING_BONUS: i64 = 15;
/// Bonus when the source name contains the term.
pub const SOURCE_BONUS: i64 = 10;
/// Bonus for articles younger than [`RECENCY_WINDOW_HOURS`].
pub const RECENCY_BONUS: i64 = 5;
/// Bonus for articles above [`CREDIBILITY_THRESHOLD`].
pub const CREDIBILITY_BONUS: i64 = 3;

/// Age limit for the recency bonus.
pub const RECENCY_WINDOW_HOURS: i64 = 24;
/// Credibility must be strictly greater than this to earn the bonus.
pub const CREDIBILITY_THRESHOLD: f64 = 90.0;

/// Score `article` against an already-lowercased `term` as of `now`.
///
/// Conditions are independent and their bonuses add up: an article can
/// earn the title, source, recency and credibility bonuses at once.
/// There is no upper bound.
pub fn relevance_score(article: &Article, term: &str, now: DateTime<Utc>) -> i64 {
    let mut score = 0;

    let title = article.title.to_lowercase();
    if title.starts_with(term) {
        score += TITLE_PREFIX_BONUS;
    } else if title.contains(term) {
        score += TITLE_SUBSTRING_BONUS;
    }

    if article.source.to_lowercase().contains(term) {
        score += SOURCE_BONUS;
    }

    if let Some(published) = article.publication_date {
        if now.signed_duration_since(published) < Duration::hours(RECENCY_WINDOW_HOURS) {
            score += RECENCY_BONUS;
        }
    }

    if article.credibility_score > CREDIBILITY_THRESHOLD {
        score += CREDIBILITY_BONUS;
    }

    score
}
