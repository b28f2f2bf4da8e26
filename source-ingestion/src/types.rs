use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use interfaces::defs::{RawItem, StandardizedItem, StandardizedMetadata, UNKNOWN_AUTHOR};

/// Entries kept per feed endpoint on every pull.
pub const FEED_ENTRY_CAP: usize = 5;

/// Below this many seed + feed items the synthetic connector tops up the batch.
pub const LOW_VOLUME_THRESHOLD: usize = 3;

/// Characters of an entry summary carried into `content`.
pub const SUMMARY_CHAR_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Sunday-Digest-Ingest/1.0".to_string(),
            timeout_seconds: 15,
            max_retries: 1,
            retry_delay_seconds: 2,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// A named syndication endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEndpoint {
    pub name: String,
    pub url: String,
}

impl FeedEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    /// Native entry id (RSS guid / Atom id); `None` when the feed omits it.
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Source {source_name} timed out after {seconds}s")]
    Timeout { source_name: String, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Schema violation: {0}")]
    Schema(#[from] interfaces::SchemaError),

    #[error("Batch sink error: {0}")]
    Sink(#[from] interfaces::SinkError),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
