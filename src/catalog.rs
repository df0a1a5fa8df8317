//! Lesson catalog - the static `lessons.json` feed and the records it holds
//!
//! The catalog is read-only: it is fetched once (over HTTP or from disk), parsed
//! into immutable [`Lesson`] records and shared as `Arc<Lesson>` from then on.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog server answered HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stable lesson identifier. The feed uses both numbers and strings, so ids are
/// normalized to their string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LessonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Duration as published in the feed: the label shown to the user plus the
/// parsed length when the label is machine readable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonDuration {
    label: String,
    length: Option<Duration>,
}

impl LessonDuration {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_string();
        let length = parse_clock(&label);
        Self { label, length }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        match Duration::try_from_secs_f64(seconds) {
            Ok(length) => Self {
                label: format_clock(length),
                length: Some(length),
            },
            // negative, NaN or too large to represent
            Err(_) => Self {
                label: seconds.to_string(),
                length: None,
            },
        }
    }

    pub fn unknown() -> Self {
        Self {
            label: String::new(),
            length: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn length(&self) -> Option<Duration> {
        self.length
    }
}

/// Parse `ss`, `m:ss` or `h:mm:ss`.
pub fn parse_clock(label: &str) -> Option<Duration> {
    let parts: Vec<&str> = label.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u64 = part.trim().parse().ok()?;
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(Duration::from_secs(total))
}

pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Where a lesson's audio lives once resolved against the catalog location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource {
    Remote(Url),
    Local(PathBuf),
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Remote(url) => write!(f, "{}", url),
            AudioSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One playable instructional track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub duration: LessonDuration,
    pub audio: Option<AudioSource>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogLocation {
    Remote(Url),
    Local(PathBuf),
}

impl CatalogLocation {
    /// `http(s)://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Result<Self, url::ParseError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Remote(Url::parse(location)?))
        } else {
            Ok(Self::Local(PathBuf::from(location)))
        }
    }

    /// Resolve an audio locator from the feed. Absolute URLs and absolute paths
    /// are taken as-is, relative locators are joined onto the catalog location.
    pub fn resolve(&self, locator: &str) -> Option<AudioSource> {
        let locator = locator.trim();
        if locator.is_empty() {
            return None;
        }

        if let Ok(url) = Url::parse(locator) {
            if matches!(url.scheme(), "http" | "https") {
                return Some(AudioSource::Remote(url));
            }
            if url.scheme() == "file" {
                return url.to_file_path().ok().map(AudioSource::Local);
            }
        }

        match self {
            CatalogLocation::Remote(base) => base.join(locator).ok().map(AudioSource::Remote),
            CatalogLocation::Local(path) => {
                let candidate = Path::new(locator);
                if candidate.is_absolute() {
                    Some(AudioSource::Local(candidate.to_path_buf()))
                } else {
                    let dir = path.parent().unwrap_or_else(|| Path::new(""));
                    Some(AudioSource::Local(dir.join(candidate)))
                }
            }
        }
    }
}

impl fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLocation::Remote(url) => write!(f, "{}", url),
            CatalogLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(f64),
    Label(String),
}

#[derive(Deserialize)]
struct RawLesson {
    id: RawId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: Option<RawDuration>,
    #[serde(default, alias = "audioSource", alias = "src", alias = "url")]
    audio: Option<String>,
}

/// Parse a catalog payload. Entries keep feed order; a repeated id keeps the
/// first occurrence.
pub fn parse_catalog(
    payload: &[u8],
    location: &CatalogLocation,
) -> Result<Vec<Arc<Lesson>>, CatalogError> {
    let raw: Vec<RawLesson> = serde_json::from_slice(payload)?;
    let mut seen = HashSet::new();
    let mut lessons = Vec::with_capacity(raw.len());

    for entry in raw {
        let id = match entry.id {
            RawId::Number(n) => LessonId::new(n.to_string()),
            RawId::Text(s) => LessonId::new(s),
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(lesson_id = %id, "Duplicate lesson id in catalog, keeping first");
            continue;
        }

        let duration = match entry.duration {
            Some(RawDuration::Seconds(secs)) => LessonDuration::from_seconds(secs),
            Some(RawDuration::Label(label)) => LessonDuration::from_label(&label),
            None => LessonDuration::unknown(),
        };
        let audio = entry.audio.as_deref().and_then(|l| location.resolve(l));
        if audio.is_none() {
            tracing::debug!(lesson_id = %id, "Lesson has no audio source");
        }

        lessons.push(Arc::new(Lesson {
            id,
            title: entry.title,
            duration,
            audio,
        }));
    }

    Ok(lessons)
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Arc<Lesson>>, CatalogError>;

    fn location(&self) -> &CatalogLocation;
}

/// Catalog backed by either an HTTP endpoint or a local file.
pub struct Catalog {
    client: reqwest::Client,
    location: CatalogLocation,
}

impl Catalog {
    pub fn new(client: reqwest::Client, location: CatalogLocation) -> Self {
        Self { client, location }
    }
}

#[async_trait]
impl CatalogSource for Catalog {
    async fn fetch(&self) -> Result<Vec<Arc<Lesson>>, CatalogError> {
        let payload = match &self.location {
            CatalogLocation::Remote(url) => {
                tracing::debug!(url = %url, "Fetching catalog");
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status));
                }
                response.bytes().await?.to_vec()
            }
            CatalogLocation::Local(path) => {
                tracing::debug!(path = %path.display(), "Reading catalog");
                tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?
            }
        };

        let lessons = parse_catalog(&payload, &self.location)?;
        tracing::info!(location = %self.location, lessons = lessons.len(), "Catalog loaded");
        Ok(lessons)
    }

    fn location(&self) -> &CatalogLocation {
        &self.location
    }
}
