//! Error types shared by the fetcher, the extractors and the adapters.
//!
//! None of these escape the public adapter entry points: [`FetchError`] and
//! page-level [`ExtractionError`]s are folded into a degraded payload, and
//! per-item [`ExtractionError`]s only drop the item they belong to.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving a page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{status} returned by {url}")]
    Status { url: String, status: StatusCode },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a transport error, separating timeouts from everything else.
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                source: e,
            }
        } else if let Some(status) = e.status() {
            FetchError::Status {
                url: url.to_string(),
                status,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

/// Failure while turning markup into a record.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    #[error("assembled item has an empty title")]
    EmptyTitle,
}

/// Failure while loading [`crate::config::ScrapeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("timeout_secs must be positive")]
    ZeroTimeout,
}

/// Anything that can abort a whole page. Only ever observed at the adapter
/// boundary, where it becomes a degraded payload.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
