//! Embed type detection and normalization
//!
//! This module classifies a raw user submission (a bare URL, an `<iframe>`
//! snippet, or a `<blockquote>` snippet) into a typed [`EmbedDescriptor`]
//! that the presentation layer can render as an iframe, an image, or a
//! plain link.
//!
//! Classification is purely syntactic and never fails: anything that cannot
//! be understood degrades to [`EmbedKind::Link`] carrying the raw input.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default cap on classified input (64 KiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;

/// Length of every YouTube video ID
pub const YOUTUBE_ID_LEN: usize = 11;

/// File extensions treated as direct image links
const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

/// Error returned when parsing an [`EmbedType`] from a string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown embed type: {0}")]
pub struct UnknownEmbedType(pub String);

/// Type of embed, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    /// YouTube video
    YouTube,
    /// Tweet (twitter.com or x.com)
    Twitter,
    /// Generic third-party iframe or blockquote snippet
    Iframe,
    /// Direct image URL
    Image,
    /// Anything else
    Link,
}

impl EmbedType {
    /// All embed types, in classification priority order
    pub const ALL: [EmbedType; 5] = [
        EmbedType::YouTube,
        EmbedType::Twitter,
        EmbedType::Iframe,
        EmbedType::Image,
        EmbedType::Link,
    ];

    /// Get the embed type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::YouTube => "youtube",
            EmbedType::Twitter => "twitter",
            EmbedType::Iframe => "iframe",
            EmbedType::Image => "image",
            EmbedType::Link => "link",
        }
    }
}

impl fmt::Display for EmbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedType {
    type Err = UnknownEmbedType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EmbedType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEmbedType(s.to_string()))
    }
}

/// Canonical iframe source for a YouTube video
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

/// Thumbnail URL for a YouTube video at max resolution (1280x720)
pub fn youtube_thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Classified embed payload
///
/// Only the YouTube variant carries a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EmbedKind {
    /// YouTube video with its canonical embed URL
    #[serde(rename = "youtube", rename_all = "camelCase")]
    YouTube {
        /// `https://www.youtube.com/embed/{id}`
        embed_url: String,
        /// `https://img.youtube.com/vi/{id}/maxresdefault.jpg`
        thumbnail: String,
    },
    /// Tweet
    #[serde(rename = "twitter", rename_all = "camelCase")]
    Twitter {
        /// Extracted tweet URL, or the original submission
        embed_url: String,
    },
    /// Generic embed snippet
    #[serde(rename = "iframe", rename_all = "camelCase")]
    Iframe {
        /// Extracted source URL, or the raw snippet
        embed_url: String,
    },
    /// Direct image link
    #[serde(rename = "image", rename_all = "camelCase")]
    Image {
        /// Image URL
        embed_url: String,
    },
    /// Plain link
    #[serde(rename = "link", rename_all = "camelCase")]
    Link {
        /// Original submission
        embed_url: String,
    },
}

/// Embed descriptor attached to a saved content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedDescriptor {
    /// Classified payload
    #[serde(flatten)]
    pub kind: EmbedKind,

    /// Reserved display title; the classifier never sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<EmbedKind> for EmbedDescriptor {
    fn from(kind: EmbedKind) -> Self {
        Self { kind, title: None }
    }
}

impl EmbedDescriptor {
    /// YouTube descriptor for a video ID
    pub fn youtube(video_id: &str) -> Self {
        EmbedKind::YouTube {
            embed_url: youtube_embed_url(video_id),
            thumbnail: youtube_thumbnail_url(video_id),
        }
        .into()
    }

    /// Twitter descriptor
    pub fn twitter(embed_url: impl Into<String>) -> Self {
        EmbedKind::Twitter { embed_url: embed_url.into() }.into()
    }

    /// Iframe descriptor
    pub fn iframe(embed_url: impl Into<String>) -> Self {
        EmbedKind::Iframe { embed_url: embed_url.into() }.into()
    }

    /// Image descriptor
    pub fn image(embed_url: impl Into<String>) -> Self {
        EmbedKind::Image { embed_url: embed_url.into() }.into()
    }

    /// Link descriptor
    pub fn link(embed_url: impl Into<String>) -> Self {
        EmbedKind::Link { embed_url: embed_url.into() }.into()
    }

    /// Get the embed type
    pub fn embed_type(&self) -> EmbedType {
        match self.kind {
            EmbedKind::YouTube { .. } => EmbedType::YouTube,
            EmbedKind::Twitter { .. } => EmbedType::Twitter,
            EmbedKind::Iframe { .. } => EmbedType::Iframe,
            EmbedKind::Image { .. } => EmbedType::Image,
            EmbedKind::Link { .. } => EmbedType::Link,
        }
    }

    /// Get the URL (or snippet) to embed or display
    pub fn embed_url(&self) -> &str {
        match &self.kind {
            EmbedKind::YouTube { embed_url, .. }
            | EmbedKind::Twitter { embed_url }
            | EmbedKind::Iframe { embed_url }
            | EmbedKind::Image { embed_url }
            | EmbedKind::Link { embed_url } => embed_url,
        }
    }

    /// Get the thumbnail URL, present only for YouTube
    pub fn thumbnail(&self) -> Option<&str> {
        match &self.kind {
            EmbedKind::YouTube { thumbnail, .. } => Some(thumbnail),
            _ => None,
        }
    }

    /// Check if this is a YouTube embed
    pub fn is_youtube(&self) -> bool {
        matches!(self.kind, EmbedKind::YouTube { .. })
    }

    /// Check if this is a plain link
    pub fn is_link(&self) -> bool {
        matches!(self.kind, EmbedKind::Link { .. })
    }
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Inputs longer than this many bytes skip pattern matching and are
    /// classified as plain links. `None` disables the cap.
    pub max_input_bytes: Option<usize>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
        }
    }
}

/// Embed classifier
#[derive(Debug, Clone, Default)]
pub struct EmbedClassifier {
    config: ClassifierConfig,
}

impl EmbedClassifier {
    /// Create a classifier with the given configuration
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Get the classifier configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a raw submission
    ///
    /// Markup is checked before URL parsing: embed snippets are HTML
    /// fragments, not URLs. This never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use app_core::embeds::{EmbedClassifier, EmbedType};
    ///
    /// let classifier = EmbedClassifier::default();
    /// let embed = classifier.classify("https://youtu.be/dQw4w9WgXcQ");
    /// assert_eq!(embed.embed_type(), EmbedType::YouTube);
    /// assert_eq!(embed.embed_url(), "https://www.youtube.com/embed/dQw4w9WgXcQ");
    /// ```
    pub fn classify(&self, input: &str) -> EmbedDescriptor {
        if let Some(max) = self.config.max_input_bytes {
            if input.len() > max {
                warn!(len = input.len(), max, "embed input over size cap, treating as link");
                return EmbedDescriptor::link(input);
            }
        }

        let embed = if is_embed_markup(input) {
            classify_markup(input)
        } else {
            match Url::parse(input) {
                Ok(url) => classify_by_hostname(input, &url),
                Err(e) => {
                    debug!(error = %e, "input is not an absolute URL");
                    EmbedDescriptor::link(input)
                }
            }
        };

        debug!(embed_type = %embed.embed_type(), "classified embed");
        embed
    }
}

/// Classify a raw submission with the default configuration
pub fn classify(input: &str) -> EmbedDescriptor {
    EmbedClassifier::default().classify(input)
}

/// Check whether a submission is an embed snippet rather than a URL
///
/// Case-sensitive substring test.
pub fn is_embed_markup(input: &str) -> bool {
    input.contains("<iframe") || input.contains("<blockquote")
}

fn youtube_src_regex() -> &'static Regex {
    static YOUTUBE_SRC: OnceLock<Regex> = OnceLock::new();
    YOUTUBE_SRC.get_or_init(|| {
        Regex::new(r#"(?i)src=["']([^"']*youtube\.com/embed/[^"']*)["']"#).unwrap()
    })
}

fn twitter_href_regex() -> &'static Regex {
    static TWITTER_HREF: OnceLock<Regex> = OnceLock::new();
    TWITTER_HREF.get_or_init(|| {
        Regex::new(r#"(?i)href=["']([^"']*(?:twitter\.com|x\.com)[^"']*)["']"#).unwrap()
    })
}

fn any_attr_regex() -> &'static Regex {
    static ANY_ATTR: OnceLock<Regex> = OnceLock::new();
    ANY_ATTR.get_or_init(|| Regex::new(r#"(?i)(?:src|href)=["']([^"']*)["']"#).unwrap())
}

fn markup_embed_id_regex() -> &'static Regex {
    static MARKUP_EMBED_ID: OnceLock<Regex> = OnceLock::new();
    MARKUP_EMBED_ID.get_or_init(|| Regex::new(r#"/embed/([^?&"']*)"#).unwrap())
}

fn url_video_id_regex() -> &'static Regex {
    static URL_VIDEO_ID: OnceLock<Regex> = OnceLock::new();
    // Greedy prefix: the last marker on the first line wins. The dot in
    // `youtu.be` is intentionally unescaped. `v` and `=` are optional on
    // their own, so `watch?vID` and `watch?=ID` both match.
    URL_VIDEO_ID.get_or_init(|| {
        Regex::new(
            r"^.*((youtu.be/)|(v/)|(/u/[A-Za-z0-9_]/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*",
        )
        .unwrap()
    })
}

fn url_video_id_pair_regex() -> &'static Regex {
    static URL_VIDEO_ID_PAIR: OnceLock<Regex> = OnceLock::new();
    // Same grammar with `v=` consumed only as a pair. Recovers IDs starting
    // with `v`, which the lone `v?` above eats on embed and short URLs.
    URL_VIDEO_ID_PAIR.get_or_init(|| {
        Regex::new(
            r"^.*((youtu.be/)|(v/)|(/u/[A-Za-z0-9_]/)|(embed/)|(watch\?))\??(?:v=)?([^#&?]*).*",
        )
        .unwrap()
    })
}

/// Video IDs are exactly [`YOUTUBE_ID_LEN`] ASCII characters
fn is_video_id(id: &str) -> bool {
    id.len() == YOUTUBE_ID_LEN && id.is_ascii()
}

/// Extract the most relevant URL from an embed snippet
///
/// Preference order: a YouTube embed `src`, then a twitter.com / x.com
/// `href`, then the first `src` or `href` of any kind.
pub fn extract_html_embed_url(html: &str) -> Option<String> {
    [youtube_src_regex(), twitter_href_regex(), any_attr_regex()]
        .into_iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a YouTube video ID from embed markup
///
/// Takes the text after the first `/embed/` up to `?`, `&` or a quote.
/// Unlike [`extract_youtube_id_from_url`] the length is not checked.
pub fn extract_youtube_id_from_markup(input: &str) -> Option<String> {
    markup_embed_id_regex()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Extract a YouTube video ID from a watch, short, embed or `/v/` URL
///
/// Only captures of exactly [`YOUTUBE_ID_LEN`] ASCII characters are
/// accepted. When the loose `v?=?` form yields no valid ID, the `v=` pair
/// form is tried.
pub fn extract_youtube_id_from_url(url: &str) -> Option<String> {
    [url_video_id_regex(), url_video_id_pair_regex()]
        .into_iter()
        .find_map(|re| {
            re.captures(url)
                .and_then(|caps| caps.get(7))
                .map(|m| m.as_str())
                .filter(|id| is_video_id(id))
        })
        .map(str::to_string)
}

fn classify_markup(input: &str) -> EmbedDescriptor {
    let extracted = extract_html_embed_url(input);

    if input.contains("youtube.com/embed") || input.contains("youtu.be") {
        if let Some(id) = extract_youtube_id_from_markup(input) {
            return EmbedDescriptor::youtube(&id);
        }
    }

    let embed_url = extracted.unwrap_or_else(|| input.to_string());
    if input.contains("twitter-tweet") || input.contains("twitter.com") || input.contains("x.com")
    {
        EmbedDescriptor::twitter(embed_url)
    } else {
        EmbedDescriptor::iframe(embed_url)
    }
}

/// Classify a successfully parsed URL by its hostname and path
///
/// A YouTube hostname without a valid video ID continues through the
/// remaining checks.
pub fn classify_by_hostname(input: &str, url: &Url) -> EmbedDescriptor {
    let hostname = url.host_str().unwrap_or_default().to_lowercase();

    if hostname.contains("youtube.com") || hostname.contains("youtu.be") {
        if let Some(id) = extract_youtube_id_from_url(input) {
            return EmbedDescriptor::youtube(&id);
        }
        debug!(%hostname, "youtube host without a valid video id");
    }

    if hostname.contains("twitter.com") || hostname.contains("x.com") {
        return EmbedDescriptor::twitter(input);
    }

    let path = url.path().to_lowercase();
    if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return EmbedDescriptor::image(input);
    }

    EmbedDescriptor::link(input)
}
