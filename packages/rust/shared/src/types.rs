//! Core domain types for newsdigest stores.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Date format used for every `date` field written by newsdigest.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a run date the way stores expect it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read an explicit `null` as the field's default. Older store files carry
/// `"topic": null` and `"URL": null`, which must not fail the whole file.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// RawArticle
// ---------------------------------------------------------------------------

/// An unprocessed scraped article, as written by the collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    /// Article URL (the store key).
    #[serde(rename = "URL", alias = "url", default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Headline from the feed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Extracted article text. Missing and empty are both allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Collection date, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// ProcessedArticle
// ---------------------------------------------------------------------------

/// An enriched article stored in the document collection (`contents.json`).
///
/// Field order is the serialized order. Every field defaults when missing or
/// `null` so older store files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    /// Processing date (`YYYY-MM-DD`), not the publish date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Article URL (the store key).
    #[serde(rename = "URL", alias = "url", default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Supplied or inferred topic, never empty when built by the pipeline.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    /// Full article text, kept verbatim.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Extractive summary bounded by the configured cap.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// Up to three comprehension questions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<String>,
}

// ---------------------------------------------------------------------------
// IndexEntry
// ---------------------------------------------------------------------------

/// A row of the tabular index (`database.csv`): `date,URL,topic`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "URL", alias = "url", default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
}

impl From<&ProcessedArticle> for IndexEntry {
    fn from(article: &ProcessedArticle) -> Self {
        Self {
            date: article.date.clone(),
            url: article.url.clone(),
            topic: article.topic.clone(),
        }
    }
}
