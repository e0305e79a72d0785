//! Core types for the in-memory article feed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque article identifier.
///
/// The aggregation backend hands out both numeric and string ids, so this
/// deserialises from either and always compares as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ArticleId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
        })
    }
}

/// A news article as delivered by the aggregation backend.
///
/// Treated as read-only by the engine: searches filter and sort clones,
/// never the caller's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier, unique within the current in-memory set.
    pub id: ArticleId,
    /// Headline.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Publisher name, e.g. "TechCrunch".
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Full article body, when the backend provides it.
    #[serde(default)]
    pub content: Option<String>,
    /// Short summary, used in place of `content` when that is missing.
    #[serde(default)]
    pub summary: Option<String>,
    /// Canonical link to the article.
    #[serde(default)]
    pub url: Option<String>,
    /// When the article was published. Unparseable timestamps become `None`.
    #[serde(default, alias = "published_at", deserialize_with = "lenient_timestamp")]
    pub publication_date: Option<DateTime<Utc>>,
    /// Source credibility, 0–100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub credibility_score: f64,
    /// Short topical tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Category label assigned by the aggregator.
    #[serde(default)]
    pub category: Option<String>,
    /// Numeric category id from the category catalogue.
    #[serde(default)]
    pub category_id: Option<u32>,
    /// Which upstream news API returned this article.
    #[serde(default)]
    pub api_source: Option<String>,
    /// Whether the publisher is on the premium source list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_premium_source: bool,
}

impl Article {
    /// Build an article with only the required fields set.
    pub fn new(id: impl Into<ArticleId>, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: source.into(),
            content: None,
            summary: None,
            url: None,
            publication_date: None,
            credibility_score: 0.0,
            tags: Vec::new(),
            category: None,
            category_id: None,
            api_source: None,
            is_premium_source: false,
        }
    }

    /// The searchable body text: `content`, falling back to `summary`.
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.summary.as_deref())
    }
}

/// Deserialise `null` as `T::default()`.
///
/// Pair with `#[serde(default)]` to cover missing keys as well.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Parse a feed timestamp: RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS`
/// (taken as UTC) or a bare date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
