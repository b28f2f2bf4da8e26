use crate::sources::synthetic::DEFAULT_SYNTHETIC_COUNT;
use crate::types::{FeedEndpoint, FetchConfig, IngestError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const ENV_SEED_PATH: &str = "SEED_PATH";
pub const ENV_BATCH_PATH: &str = "BATCH_PATH";
pub const ENV_FEEDS: &str = "FEEDS";
pub const ENV_SYNTHETIC_COUNT: &str = "SYNTHETIC_COUNT";

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub seed_path: PathBuf,
    pub batch_path: PathBuf,
    pub feeds: Vec<FeedEndpoint>,
    pub synthetic_count: usize,
    pub connector_timeout: Duration,
    pub fetch: FetchConfig,
}

pub fn default_feeds() -> Vec<FeedEndpoint> {
    vec![
        FeedEndpoint::new("Techno-Science", "https://www.techno-science.net/rss.xml"),
        FeedEndpoint::new("Hacker News", "https://news.ycombinator.com/rss"),
        FeedEndpoint::new(
            "Futura Tech",
            "https://www.futura-sciences.com/rss/high-tech/actualites.xml",
        ),
    ]
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            seed_path: PathBuf::from("ingestion/seeds.json"),
            batch_path: PathBuf::from("ingestion/raw_feed.json"),
            feeds: default_feeds(),
            synthetic_count: DEFAULT_SYNTHETIC_COUNT,
            connector_timeout: Duration::from_secs(20),
            fetch: FetchConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Defaults, overridden by whatever is set in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A variable that cannot be parsed is reported and its default kept, so
    /// a bad environment never stops the batch from being written.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_SEED_PATH) {
            config.seed_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_BATCH_PATH) {
            config.batch_path = PathBuf::from(path);
        }
        if let Some(list) = lookup(ENV_FEEDS) {
            match parse_feed_list(&list) {
                Ok(feeds) => config.feeds = feeds,
                Err(e) => warn!("Ignoring {}: {}; using the built-in feeds", ENV_FEEDS, e),
            }
        }
        if let Some(count) = lookup(ENV_SYNTHETIC_COUNT) {
            match count.trim().parse() {
                Ok(n) => config.synthetic_count = n,
                Err(_) => warn!(
                    "Ignoring {}={:?}: not a number; using {}",
                    ENV_SYNTHETIC_COUNT, count, config.synthetic_count
                ),
            }
        }

        config
    }
}

/// Parse `Name=url;Name=url`. Blank segments are skipped; an empty string
/// means no feeds at all.
pub fn parse_feed_list(list: &str) -> Result<Vec<FeedEndpoint>> {
    list.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, url) = segment.split_once('=').ok_or_else(|| {
                IngestError::General(format!("feed entry {segment:?} is not Name=url"))
            })?;
            let url = url.trim();
            url::Url::parse(url)?;
            Ok(FeedEndpoint::new(name.trim(), url))
        })
        .collect()
}
