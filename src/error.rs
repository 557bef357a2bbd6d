//! Error taxonomy shared by the scraping pipeline and the file utilities.
//!
//! Per-page failures ([`ScrapeError::Fetch`], [`ScrapeError::PolicyDisallowed`],
//! [`ScrapeError::NoContentRegion`]) are logged and skipped by the scrape loop.
//! Per-invocation failures ([`ScrapeError::UnknownSource`],
//! [`ScrapeError::MalformedInput`], [`ScrapeError::InvalidSplitCount`])
//! propagate to `main` and exit non-zero.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport failure or non-2xx status after retries are exhausted.
    #[error("request to {url} failed{}: {reason}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// robots.txt disallows the target path for our user agent.
    #[error("robots.txt disallows fetching {0}")]
    PolicyDisallowed(String),

    /// No content region could be located in the page.
    #[error("no content region found in page")]
    NoContentRegion,

    /// The factory has no registered scraper for the given base URL.
    #[error("no scraper registered for {0}")]
    UnknownSource(String),

    /// Filter/split input is not a JSON array of record-shaped objects.
    #[error("input is not a JSON array of records: {0}")]
    MalformedInput(String),

    /// Split part count outside `[1, record count]`.
    #[error("cannot split {available} records into {requested} parts")]
    InvalidSplitCount { requested: usize, available: usize },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
