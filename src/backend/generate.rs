//! Social post drafting through the content generation functions.
//!
//! `generate` drafts one post for one platform; `enhanced-content-generator`
//! drafts (or regenerates) posts for several platforms at once. X threads
//! come back as a single text with tweets joined by
//! [`TWEET_SEPARATOR`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use newsdesk_search::{Article, ArticleId};

use super::BackendClient;
use crate::error::{DeskError, Result};

/// Single-platform draft function.
pub const GENERATE_FUNCTION: &str = "generate";
/// Multi-platform draft function.
pub const ENHANCED_GENERATOR_FUNCTION: &str = "enhanced-content-generator";
/// Joins the tweets of an X thread.
pub const TWEET_SEPARATOR: &str = "||TWEET_SEPARATOR||";
/// Posts younger than this count as recent.
pub const RECENT_WINDOW_HOURS: i64 = 48;
/// Rows fetched for the content history view.
pub const HISTORY_LIMIT: usize = 20;

/// Social platforms posts can be drafted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    LinkedIn,
    X,
    Facebook,
    Threads,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::LinkedIn,
        Platform::X,
        Platform::Facebook,
        Platform::Threads,
    ];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
            Platform::X => "x",
            Platform::Facebook => "facebook",
            Platform::Threads => "threads",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
            Platform::X => "X (Twitter)",
            Platform::Facebook => "Facebook",
            Platform::Threads => "Threads",
        }
    }

    /// Maximum post length in characters.
    pub fn max_chars(self) -> usize {
        match self {
            Platform::Instagram => 2200,
            Platform::LinkedIn => 3000,
            Platform::X => 280,
            Platform::Facebook => 63206,
            Platform::Threads => 500,
        }
    }

    /// Share-intent URL prefilled with `content` where the platform allows it.
    pub fn share_url(self, content: &str, site: &str) -> String {
        let text = urlencoding::encode(content);
        let site = urlencoding::encode(site);
        match self {
            Platform::Instagram => "https://www.instagram.com/create/story/".into(),
            Platform::LinkedIn => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={site}&summary={text}"
            ),
            Platform::X => format!("https://twitter.com/intent/tweet?text={text}"),
            Platform::Facebook => {
                format!("https://www.facebook.com/sharer/sharer.php?u={site}&quote={text}")
            }
            Platform::Threads => format!("https://threads.net/intent/post?text={text}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::LinkedIn),
            "x" | "twitter" => Ok(Platform::X),
            "facebook" => Ok(Platform::Facebook),
            "threads" => Ok(Platform::Threads),
            other => Err(DeskError::Config(format!("unknown platform: {other}"))),
        }
    }
}

/// A drafted social post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPost {
    /// Article the post was drafted from.
    #[serde(default)]
    pub story_id: Option<ArticleId>,
    /// Target platform.
    pub platform: Platform,
    /// Post text. X threads join tweets with [`TWEET_SEPARATOR`].
    #[serde(alias = "content")]
    pub content_text: String,
    /// Suggested hashtags.
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Suggested image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the draft was generated.
    #[serde(default)]
    pub generation_date: Option<DateTime<Utc>>,
    /// Platform-specific extras, e.g. `platform_limits.max_characters`.
    #[serde(default)]
    pub platform_specific_data: Option<Value>,
    /// Whether the post has been shared.
    #[serde(default)]
    pub is_shared: bool,
}

/// One tweet of an X thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSegment {
    /// 1-based position in the thread.
    pub position: usize,
    /// Tweet text, trimmed.
    pub text: String,
    /// Length in characters.
    pub chars: usize,
}

impl ThreadSegment {
    /// Whether the tweet fits in a single X post.
    pub fn is_valid(&self) -> bool {
        self.chars <= Platform::X.max_chars()
    }
}

impl GeneratedPost {
    /// The tweets of a thread, blank segments dropped. A post without
    /// separators is a single segment.
    pub fn thread_segments(&self) -> Vec<ThreadSegment> {
        self.content_text
            .split(TWEET_SEPARATOR)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(i, text)| ThreadSegment {
                position: i + 1,
                text: text.to_string(),
                chars: text.chars().count(),
            })
            .collect()
    }

    /// Character limit, preferring a limit sent by the generator.
    pub fn char_limit(&self) -> usize {
        self.platform_specific_data
            .as_ref()
            .and_then(|data| data.pointer("/platform_limits/max_characters"))
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_else(|| self.platform.max_chars())
    }

    /// Post length in characters.
    pub fn char_count(&self) -> usize {
        self.content_text.chars().count()
    }

    /// Whether the post exceeds [`Self::char_limit`].
    pub fn is_over_limit(&self) -> bool {
        self.char_count() > self.char_limit()
    }

    /// `{platform}_content_{YYYY-MM-DD}.txt`, dated by generation date or
    /// `today` when the post has none.
    pub fn download_file_name(&self, today: NaiveDate) -> String {
        let date = self
            .generation_date
            .map(|d| d.date_naive())
            .unwrap_or(today);
        format!("{}_content_{}.txt", self.platform, date.format("%Y-%m-%d"))
    }

    /// Write the post text into `dir` and return the file path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.download_file_name(Utc::now().date_naive()));
        std::fs::write(&path, &self.content_text)?;
        tracing::info!(platform = %self.platform, path = %path.display(), "post exported");
        Ok(path)
    }

    /// Share-intent URL for this post.
    pub fn share_url(&self, site: &str) -> String {
        self.platform.share_url(&self.content_text, site)
    }
}

/// Posts generated within the last 48 hours of `now`.
pub fn recent_posts(posts: &[GeneratedPost], now: DateTime<Utc>) -> Vec<GeneratedPost> {
    let cutoff = now - Duration::hours(RECENT_WINDOW_HOURS);
    posts
        .iter()
        .filter(|post| post.generation_date.is_some_and(|d| d >= cutoff))
        .cloned()
        .collect()
}

/// Posts for any of `platforms`. An empty list keeps everything.
pub fn filter_by_platform(posts: &[GeneratedPost], platforms: &[Platform]) -> Vec<GeneratedPost> {
    posts
        .iter()
        .filter(|post| platforms.is_empty() || platforms.contains(&post.platform))
        .cloned()
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnhancedPayload {
    #[serde(default)]
    generated_content: Vec<GeneratedPost>,
}

/// Draft a post for one article and platform.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Draft a post. `article` is sent inline when the caller has it in
    /// memory; otherwise the backend looks the id up.
    async fn generate(
        &self,
        news_id: &ArticleId,
        platform: Platform,
        article: Option<&Article>,
    ) -> Result<GeneratedPost>;
}

/// Client for the generation functions and the content history table.
#[derive(Debug, Clone)]
pub struct GenerationService {
    client: BackendClient,
}

impl GenerationService {
    /// Service over `client`.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Draft posts for `platforms` in one call.
    ///
    /// # Errors
    ///
    /// Any error from the function call.
    pub async fn generate_all(
        &self,
        story_id: &ArticleId,
        platforms: &[Platform],
    ) -> Result<Vec<GeneratedPost>> {
        self.enhanced(story_id, platforms, false).await
    }

    /// Redraft a single platform's post.
    ///
    /// # Errors
    ///
    /// [`DeskError::MalformedResponse`] if the function returns no post.
    pub async fn regenerate(&self, story_id: &ArticleId, platform: Platform) -> Result<GeneratedPost> {
        self.enhanced(story_id, &[platform], true)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DeskError::MalformedResponse(format!("no {platform} post regenerated"))
            })
    }

    async fn enhanced(
        &self,
        story_id: &ArticleId,
        platforms: &[Platform],
        regenerate: bool,
    ) -> Result<Vec<GeneratedPost>> {
        let mut body = json!({
            "storyId": story_id_value(story_id),
            "platforms": platforms,
            "mode": "production",
        });
        if regenerate {
            body["regenerate"] = Value::Bool(true);
        }
        let payload: EnhancedPayload = self
            .client
            .invoke(ENHANCED_GENERATOR_FUNCTION, &body)
            .await?;
        tracing::info!(story = %story_id, posts = payload.generated_content.len(), "posts drafted");
        Ok(payload.generated_content)
    }

    /// The 20 most recently generated posts, newest first.
    ///
    /// # Errors
    ///
    /// Any error from the REST call.
    pub async fn history(&self) -> Result<Vec<GeneratedPost>> {
        let limit = HISTORY_LIMIT.to_string();
        self.client
            .select(
                "generated_content",
                &[
                    ("select", "*"),
                    ("order", "generation_date.desc"),
                    ("limit", limit.as_str()),
                ],
            )
            .await
    }
}

#[async_trait]
impl ContentGenerator for GenerationService {
    async fn generate(
        &self,
        news_id: &ArticleId,
        platform: Platform,
        article: Option<&Article>,
    ) -> Result<GeneratedPost> {
        let mut body = json!({
            "platform": platform,
            "news_id": news_id,
        });
        if let Some(article) = article {
            body["article_data"] = article_data(article);
        }

        let mut post: GeneratedPost = self.client.invoke(GENERATE_FUNCTION, &body).await?;
        if post.story_id.is_none() {
            post.story_id = Some(news_id.clone());
        }
        tracing::info!(story = %news_id, %platform, "post drafted");
        Ok(post)
    }
}

/// Inline article fields sent with a single-platform draft request.
fn article_data(article: &Article) -> Value {
    json!({
        "id": article.id,
        "title": article.title,
        "summary": article.summary.as_deref().or(article.content.as_deref()),
        "content": article.content.as_deref().or(article.summary.as_deref()),
        "url": article.url,
        "source": article.source,
    })
}

/// Numeric ids go out as numbers, anything else as a string.
fn story_id_value(id: &ArticleId) -> Value {
    id.as_str()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(id.as_str()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0)
            .single()
            .expect("valid date")
    }

    fn make_post(platform: Platform, text: &str, generated: Option<DateTime<Utc>>) -> GeneratedPost {
        GeneratedPost {
            story_id: Some(ArticleId::from("7")),
            platform,
            content_text: text.into(),
            hashtags: Vec::new(),
            image_url: None,
            generation_date: generated,
            platform_specific_data: None,
            is_shared: false,
        }
    }

    #[test]
    fn platform_wire_names_round_trip() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).expect("serialize");
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
            assert_eq!(platform.as_str().parse::<Platform>().expect("parse"), platform);
        }
        assert_eq!("Twitter".parse::<Platform>().expect("alias"), Platform::X);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_limits() {
        assert_eq!(Platform::X.max_chars(), 280);
        assert_eq!(Platform::Threads.max_chars(), 500);
        assert_eq!(Platform::Facebook.max_chars(), 63206);
    }

    #[test]
    fn share_urls_encode_content() {
        let url = Platform::X.share_url("AI & you", "https://desk.example");
        assert_eq!(url, "https://twitter.com/intent/tweet?text=AI%20%26%20you");
        let url = Platform::LinkedIn.share_url("hi", "https://desk.example");
        assert!(url.contains("url=https%3A%2F%2Fdesk.example&summary=hi"));
        assert_eq!(
            Platform::Instagram.share_url("ignored", "x"),
            "https://www.instagram.com/create/story/"
        );
    }

    #[test]
    fn thread_split_drops_blanks_and_flags_long_tweets() {
        let long = "a".repeat(281);
        let text = format!("first{TWEET_SEPARATOR}  {TWEET_SEPARATOR}{long}{TWEET_SEPARATOR} last ");
        let post = make_post(Platform::X, &text, None);
        let segments = post.thread_segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "first");
        assert!(segments[0].is_valid());
        assert_eq!(segments[1].position, 2);
        assert!(!segments[1].is_valid());
        assert_eq!(segments[2].text, "last");
    }

    #[test]
    fn plain_post_is_one_segment() {
        let post = make_post(Platform::LinkedIn, "hello", None);
        assert_eq!(post.thread_segments().len(), 1);
    }

    #[test]
    fn generator_limit_overrides_platform_default() {
        let mut post = make_post(Platform::Threads, &"x".repeat(600), None);
        assert!(post.is_over_limit());
        post.platform_specific_data = Some(json!({"platform_limits": {"max_characters": 1000}}));
        assert_eq!(post.char_limit(), 1000);
        assert!(!post.is_over_limit());
    }

    #[test]
    fn download_name_uses_generation_date() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).expect("date");
        let dated = make_post(Platform::Facebook, "t", Some(at(3, 23)));
        assert_eq!(dated.download_file_name(today), "facebook_content_2026-04-03.txt");
        let undated = make_post(Platform::X, "t", None);
        assert_eq!(undated.download_file_name(today), "x_content_2026-05-01.txt");
    }

    #[test]
    fn save_to_writes_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let post = make_post(Platform::LinkedIn, "Big news today", Some(at(2, 9)));
        let path = post.save_to(&dir.path().join("exports")).expect("save");
        assert!(path.ends_with("linkedin_content_2026-04-02.txt"));
        assert_eq!(std::fs::read_to_string(path).expect("read"), "Big news today");
    }

    #[test]
    fn recent_posts_keep_last_48_hours() {
        let now = at(10, 12);
        let posts = vec![
            make_post(Platform::X, "fresh", Some(at(10, 1))),
            make_post(Platform::X, "edge", Some(at(8, 12))),
            make_post(Platform::X, "stale", Some(at(8, 11))),
            make_post(Platform::X, "undated", None),
        ];
        let recent = recent_posts(&posts, now);
        let texts: Vec<&str> = recent.iter().map(|p| p.content_text.as_str()).collect();
        assert_eq!(texts, ["fresh", "edge"]);
    }

    #[test]
    fn platform_filter() {
        let posts = vec![
            make_post(Platform::X, "a", None),
            make_post(Platform::Threads, "b", None),
            make_post(Platform::LinkedIn, "c", None),
        ];
        assert_eq!(filter_by_platform(&posts, &[Platform::X, Platform::LinkedIn]).len(), 2);
        assert_eq!(filter_by_platform(&posts, &[]).len(), 3);
    }

    #[test]
    fn post_accepts_content_alias() {
        let post: GeneratedPost =
            serde_json::from_value(json!({"platform": "threads", "content": "hey"})).expect("parse");
        assert_eq!(post.content_text, "hey");
        assert!(post.story_id.is_none());
    }

    #[test]
    fn article_data_falls_back_between_body_fields() {
        let mut article = Article::new("9", "T", "S");
        article.summary = Some("short".into());
        let data = article_data(&article);
        assert_eq!(data["summary"], "short");
        assert_eq!(data["content"], "short");
    }

    #[test]
    fn numeric_story_ids_sent_as_numbers() {
        assert_eq!(story_id_value(&ArticleId::from("42")), json!(42));
        assert_eq!(story_id_value(&ArticleId::from("abc")), json!("abc"));
    }
}
