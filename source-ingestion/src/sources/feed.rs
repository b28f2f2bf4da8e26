use crate::traits::PullFeed;
use crate::types::{
    FeedEndpoint, ParsedEntry, RawItem, Result, FEED_ENTRY_CAP, SUMMARY_CHAR_LIMIT, UNKNOWN_AUTHOR,
};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

enum Mode {
    Http { url: String, fetcher: Arc<Fetcher> },
    Fixture(String),
}

/// A named RSS/Atom endpoint, pulled over HTTP or read from an inline document.
pub struct FeedSource {
    pub name: String,
    mode: Mode,
    parser: FeedParser,
    entry_cap: usize,
}

impl FeedSource {
    pub fn from_endpoint(endpoint: &FeedEndpoint, fetcher: Arc<Fetcher>) -> Self {
        Self::with_mode(
            endpoint.name.clone(),
            Mode::Http {
                url: endpoint.url.clone(),
                fetcher,
            },
        )
    }

    pub fn from_fixture(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self::with_mode(name.into(), Mode::Fixture(document.into()))
    }

    fn with_mode(name: String, mode: Mode) -> Self {
        Self {
            name,
            mode,
            parser: FeedParser::new(),
            entry_cap: FEED_ENTRY_CAP,
        }
    }

    pub fn with_entry_cap(mut self, entry_cap: usize) -> Self {
        self.entry_cap = entry_cap;
        self
    }

    fn location(&self) -> &str {
        match &self.mode {
            Mode::Http { url, .. } => url,
            Mode::Fixture(_) => "<fixture>",
        }
    }

    fn to_raw_item(&self, entry: ParsedEntry, ingested_at: f64) -> RawItem {
        let id = entry_id(&self.name, &entry);
        let summary = truncate_chars(entry.summary.as_deref().unwrap_or_default(), SUMMARY_CHAR_LIMIT);
        let timestamp = entry
            .published_at
            .map(|dt| dt.timestamp_millis() as f64 / 1000.0)
            .unwrap_or(ingested_at);

        let mut raw_metadata = Map::new();
        raw_metadata.insert(
            "link".to_string(),
            Value::from(entry.link.clone().unwrap_or_default()),
        );

        RawItem {
            id,
            source: self.name.clone(),
            content: format!("{} - {}...", entry.title, summary),
            author: entry.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            timestamp,
            raw_metadata,
        }
    }
}

/// Native id, else the entry link, else a name-based UUID over (source, link, title).
///
/// The result is the only dedup key downstream, so it must be stable across runs.
pub fn entry_id(source: &str, entry: &ParsedEntry) -> String {
    if let Some(guid) = &entry.guid {
        return guid.clone();
    }
    if let Some(link) = &entry.link {
        return link.clone();
    }
    let key = format!(
        "{}\n{}\n{}",
        source,
        entry.link.as_deref().unwrap_or_default(),
        entry.title
    );
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[async_trait]
impl PullFeed for FeedSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    async fn pull(&self) -> Result<Vec<RawItem>> {
        info!("Requesting {} ({})", self.name, self.location());

        let content = match &self.mode {
            Mode::Http { url, fetcher } => fetcher.fetch_feed(url).await?,
            Mode::Fixture(document) => document.clone(),
        };

        let parsed = self.parser.parse_feed(&content)?;
        let ingested_at = Utc::now().timestamp_millis() as f64 / 1000.0;

        let items: Vec<RawItem> = parsed
            .entries
            .into_iter()
            .take(self.entry_cap)
            .map(|entry| self.to_raw_item(entry, ingested_at))
            .collect();

        info!("Pulled {} items from {}", items.len(), self.name);
        Ok(items)
    }
}
