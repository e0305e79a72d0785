//! Cheap positional fuzzy matcher.
//!
//! This is deliberately not an edit distance: characters are compared at
//! the same index only, so transpositions and mid-string insertions are
//! missed beyond the slack given by the length difference.

/// Check whether `a` and `b` differ by at most `max_distance` characters.
///
/// The two strings are rejected immediately if their lengths (in `char`s)
/// differ by more than `max_distance`. Otherwise the common prefix is
/// scanned left to right, counting positions where the characters differ
/// and bailing out as soon as the count exceeds the budget. The final
/// verdict is `mismatches + length_difference <= max_distance`.
///
/// # Examples
///
/// ```
/// use newsdesk_search::engine::fuzzy::fuzzy_match;
///
/// assert!(fuzzy_match("gpt4", "gpt5", 1));
/// assert!(fuzzy_match("gpt4", "gpt44", 1));
/// assert!(!fuzzy_match("gpt4", "gpt444", 1));
/// ```
pub fn fuzzy_match(a: &str, b: &str, max_distance: usize) -> bool {
    let len_diff = a.chars().count().abs_diff(b.chars().count());
    if len_diff > max_distance {
        return false;
    }

    let mut mismatches = 0usize;
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            mismatches += 1;
            if mismatches > max_distance {
                return false;
            }
        }
    }

    mismatches + len_diff <= max_distance
}
