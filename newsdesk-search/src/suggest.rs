//! Suggestion shortlist shown under the search input.
//!
//! Suggestions come from three fixed-priority pools: the user's recent
//! searches, a static list of trending topics and a canonical hashtag list.

use serde::Serialize;

/// Static trending topics, in display order.
pub const TRENDING_TOPICS: &[&str] = &[
    "AI regulation",
    "ChatGPT",
    "machine learning",
    "OpenAI",
    "autonomous vehicles",
    "AI safety",
    "neural networks",
    "GPT-4",
    "artificial intelligence",
    "deep learning",
];

/// Canonical AI hashtags, in display order.
pub const COMMON_AI_TAGS: &[&str] = &[
    "#artificialintelligence",
    "#machinelearning",
    "#deeplearning",
    "#nlp",
    "#computervision",
    "#robotics",
    "#automation",
    "#aisafety",
    "#ethicalai",
    "#airegulation",
];

/// Hard cap on the suggestion list.
pub const MAX_SUGGESTIONS: usize = 6;

const EMPTY_RECENT: usize = 3;
const EMPTY_TRENDING: usize = 4;
const MATCH_RECENT: usize = 2;
const MATCH_TRENDING: usize = 3;
const MATCH_TAGS: usize = 2;

/// Where a suggestion came from, for choosing its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// One of the user's recent searches.
    Recent,
    /// A static trending topic.
    Trending,
    /// A hashtag.
    Tag,
    /// Anything else.
    Plain,
}

/// Build the suggestion list for `partial` using the default cap.
///
/// With an empty (or whitespace) input this is the first three recent
/// searches followed by the first four trending topics. Otherwise each pool
/// is filtered case-insensitively by substring: recent (up to 2), trending
/// (up to 3), hashtags (up to 2), concatenated. Never more than
/// [`MAX_SUGGESTIONS`] entries either way.
pub fn suggest(partial: &str, recent: &[String]) -> Vec<String> {
    suggest_with_limit(partial, recent, MAX_SUGGESTIONS)
}

/// [`suggest`] with an explicit cap.
pub fn suggest_with_limit(partial: &str, recent: &[String], limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(limit);

    if partial.trim().is_empty() {
        out.extend(recent.iter().take(EMPTY_RECENT).cloned());
        out.extend(
            TRENDING_TOPICS
                .iter()
                .take(EMPTY_TRENDING)
                .map(|topic| (*topic).to_string()),
        );
        out.truncate(limit);
        return out;
    }

    let needle = partial.to_lowercase();
    let hit = |candidate: &str| candidate.to_lowercase().contains(&needle);

    out.extend(
        recent
            .iter()
            .filter(|entry| hit(entry.as_str()))
            .take(MATCH_RECENT)
            .cloned(),
    );
    out.extend(
        TRENDING_TOPICS
            .iter()
            .filter(|topic| hit(**topic))
            .take(MATCH_TRENDING)
            .map(|topic| (*topic).to_string()),
    );
    out.extend(
        COMMON_AI_TAGS
            .iter()
            .filter(|tag| hit(**tag))
            .take(MATCH_TAGS)
            .map(|tag| (*tag).to_string()),
    );

    out.truncate(limit);
    out
}

/// Classify a suggestion for display. Recent wins over trending, which
/// wins over hashtag.
pub fn classify(suggestion: &str, recent: &[String]) -> SuggestionKind {
    if recent.iter().any(|entry| entry == suggestion) {
        SuggestionKind::Recent
    } else if TRENDING_TOPICS.contains(&suggestion) {
        SuggestionKind::Trending
    } else if suggestion.starts_with('#') {
        SuggestionKind::Tag
    } else {
        SuggestionKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recent(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn empty_input_without_history_lists_trending() {
        let out = suggest("", &[]);
        assert_eq!(
            out,
            ["AI regulation", "ChatGPT", "machine learning", "OpenAI"]
        );
    }

    #[test]
    fn empty_input_leads_with_recent() {
        let out = suggest("  ", &recent(&["llama", "mistral"]));
        assert_eq!(out[0], "llama");
        assert_eq!(out[1], "mistral");
        assert_eq!(out[2], "AI regulation");
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn empty_input_capped_even_with_full_history() {
        let out = suggest("", &recent(&["a1", "a2", "a3", "a4", "a5"]));
        assert_eq!(out.len(), MAX_SUGGESTIONS);
        assert_eq!(&out[..3], ["a1", "a2", "a3"]);
    }

    #[test]
    fn filters_each_pool_case_insensitively() {
        let out = suggest("AI", &recent(&["ai chips", "openai devday", "ai act", "crypto"]));
        // recent: 2 of 3 matches; trending: "AI regulation", "OpenAI", "AI safety"
        assert_eq!(&out[..2], ["ai chips", "openai devday"]);
        assert_eq!(out[2], "AI regulation");
        assert!(out.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn hashtag_pool_contributes_up_to_two() {
        let out = suggest("#", &[]);
        assert_eq!(out, ["#artificialintelligence", "#machinelearning"]);
    }

    #[test]
    fn learning_hits_trending_and_tags() {
        let out = suggest("learning", &[]);
        assert_eq!(
            out,
            [
                "machine learning",
                "deep learning",
                "#machinelearning",
                "#deeplearning"
            ]
        );
    }

    #[test]
    fn no_match_is_empty() {
        assert!(suggest("zzzz", &recent(&["alpha"])).is_empty());
    }

    #[test]
    fn custom_limit_respected() {
        let out = suggest_with_limit("", &[], 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn classify_kinds() {
        let history = recent(&["OpenAI"]);
        assert_eq!(classify("OpenAI", &history), SuggestionKind::Recent);
        assert_eq!(classify("ChatGPT", &history), SuggestionKind::Trending);
        assert_eq!(classify("#nlp", &history), SuggestionKind::Tag);
        assert_eq!(classify("quantum", &history), SuggestionKind::Plain);
    }
}
