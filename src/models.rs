//! Data models for scraped content records.
//!
//! Every page a site scraper captures becomes one [`ContentRecord`], the
//! atomic unit of output. Records are serialized as a JSON array, one object
//! per record, and read back by the filter and split utilities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of page a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    About,
    Publication,
    News,
    Team,
}

/// One scraped page, normalized to plain text.
///
/// The body preserves hyperlinks as inline `[text](url)` markers and contains
/// no raw markup. URLs are unique within a single scrape run's output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Organization the record came from (e.g. `"anthropic.com"`).
    pub source: String,
    /// Absolute URL of the scraped page.
    pub url: String,
    /// Page title, when one could be located.
    pub title: Option<String>,
    /// Plain-text body with inline link markers.
    pub body: String,
    pub content_type: ContentType,
    /// When the page was fetched.
    pub retrieved_at: DateTime<Utc>,
}

/// Derive the per-site output filename from a base URL host,
/// e.g. `https://www.anthropic.com` -> `www_anthropic_com_data.json`.
pub fn output_filename(base_url: &str) -> String {
    let host = url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| base_url.trim_start_matches("https://").to_string());
    format!("{}_data.json", host.replace('.', "_"))
}
