//! URL normalisation for article de-duplication.
//!
//! The upstream news APIs hand out the same story under many URLs: with
//! campaign and syndication parameters, over `http` or `https`, with or
//! without `www.`, and as AMP pages. Normalised URLs compare equal in those
//! cases so [`dedup`](super::dedup) can merge them.

use url::Url;

/// Query parameters dropped by exact (case-insensitive) name.
const TRACKING_PARAMS: &[&str] = &[
    // Ad and social click ids.
    "fbclid",
    "gclid",
    "msclkid",
    "mc_cid",
    "mc_eid",
    // Publisher and syndication tags.
    "cmpid",
    "cmp",
    "ocid",
    "smid",
    "smtyp",
    "ftag",
    "ito",
    "taid",
    "ref",
    "outputtype",
    // Consent-wall round trips.
    "guccounter",
    "guce_referrer",
    "guce_referrer_sig",
];

/// Query parameter prefixes dropped wholesale.
const TRACKING_PREFIXES: &[&str] = &["utm_", "at_"];

fn is_tracking(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TRACKING_PARAMS.contains(&key.as_str())
        || TRACKING_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Normalise an article URL.
///
/// 1. Drop the fragment and any default port.
/// 2. Upgrade `http` to `https` and drop a leading `www.`.
/// 3. Strip tracking parameters and sort the rest by key.
/// 4. Drop a trailing `/amp` segment, then a trailing slash (unless the
///    path is exactly `"/"`).
///
/// Scheme and host are lowercased by the parser. Input that does not
/// parse as a URL is trimmed and returned otherwise unchanged.
///
/// # Examples
///
/// ```
/// use newsdesk_search::collection::normalize_url;
///
/// let a = normalize_url("http://www.TechCrunch.com/2026/ai/amp/?utm_source=x#top");
/// let b = normalize_url("https://techcrunch.com/2026/ai");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if matches!(
        (parsed.scheme(), parsed.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = parsed.set_port(None);
    }
    if parsed.scheme() == "http" {
        let _ = parsed.set_scheme("https");
    }

    if let Some(bare) = parsed.host_str().and_then(|h| h.strip_prefix("www.")) {
        let bare = bare.to_string();
        let _ = parsed.set_host(Some(&bare));
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&query));
    }

    let mut path = parsed.path().trim_end_matches('/').to_string();
    if let Some(canonical) = path.strip_suffix("/amp") {
        path = canonical.to_string();
    }
    if path.is_empty() {
        path.push('/');
    }
    parsed.set_path(&path);

    parsed.to_string()
}
