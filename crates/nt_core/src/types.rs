use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_SOURCE: &str = "Unknown";
pub const DEFAULT_SUMMARY: &str = "No summary available.";
pub const DEFAULT_IMAGE: &str = "/globe.svg";
pub const DEFAULT_URL: &str = "#";

/// Position of an article within one headline fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(pub usize);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Article record as the news provider sends it. Any field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<ProviderSource>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ProviderArticle {
    /// Reads one provider record field by field. Fields of the wrong type
    /// count as absent; a record that is not an object yields all-absent.
    pub fn from_value(value: &Value) -> Self {
        let source = value
            .get("source")
            .filter(|s| s.is_object())
            .map(|s| ProviderSource {
                id: text_field(s, "id"),
                name: text_field(s, "name"),
            });
        Self {
            title: text_field(value, "title"),
            source,
            published_at: text_field(value, "publishedAt"),
            description: text_field(value, "description"),
            url_to_image: text_field(value, "urlToImage"),
            url: text_field(value, "url"),
        }
    }
}

fn text_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Normalized article shown to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub summary: String,
    pub image_url: String,
    pub url: String,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl Article {
    /// Normalizes a provider record, filling every absent or empty field with
    /// its default. `fetched_at` stands in for a missing publication date.
    pub fn from_provider(id: ArticleId, raw: &ProviderArticle, fetched_at: DateTime<Utc>) -> Self {
        let source = raw.source.as_ref().and_then(|s| present(s.name.as_ref()));
        Self {
            id,
            title: raw.title.clone().unwrap_or_default(),
            source: source.unwrap_or(DEFAULT_SOURCE).to_string(),
            published_at: present(raw.published_at.as_ref())
                .map(str::to_string)
                .unwrap_or_else(|| fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            summary: present(raw.description.as_ref())
                .unwrap_or(DEFAULT_SUMMARY)
                .to_string(),
            image_url: present(raw.url_to_image.as_ref())
                .unwrap_or(DEFAULT_IMAGE)
                .to_string(),
            url: present(raw.url.as_ref()).unwrap_or(DEFAULT_URL).to_string(),
        }
    }

    /// Maps a whole provider list, numbering articles by position.
    pub fn from_provider_list(raw: &[ProviderArticle], fetched_at: DateTime<Utc>) -> Vec<Self> {
        raw.iter()
            .enumerate()
            .map(|(idx, a)| Self::from_provider(ArticleId(idx), a, fetched_at))
            .collect()
    }
}

/// Rewrite progress of a single article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum RewriteState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl RewriteState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RewriteState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RewriteState::Succeeded(_) | RewriteState::Failed(_))
    }
}
