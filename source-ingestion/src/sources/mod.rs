pub mod feed;
pub mod seed;
pub mod synthetic;

pub use feed::FeedSource;
pub use seed::SeedSource;
pub use synthetic::SyntheticSource;

use crate::traits::PullFeed;
use crate::types::{IngestError, RawItem, Result};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CONNECTOR_TIMEOUT: Duration = Duration::from_secs(20);

/// The closed set of source kinds the aggregator knows how to drive.
pub enum SourceConnector {
    Seed(SeedSource),
    Feed(FeedSource),
    Synthetic(SyntheticSource),
}

/// What one connector produced. A failed connector contributes no items.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    pub items: Vec<RawItem>,
    pub error: Option<String>,
}

impl SourceConnector {
    fn as_pull_feed(&self) -> &dyn PullFeed {
        match self {
            SourceConnector::Seed(source) => source,
            SourceConnector::Feed(source) => source,
            SourceConnector::Synthetic(source) => source,
        }
    }

    pub fn source_name(&self) -> String {
        self.as_pull_feed().source_name()
    }

    /// Pull with a deadline, surfacing any failure.
    pub async fn try_fetch(&self, timeout: Duration) -> Result<Vec<RawItem>> {
        match tokio::time::timeout(timeout, self.as_pull_feed().pull()).await {
            Ok(result) => result,
            Err(_) => Err(IngestError::Timeout {
                source_name: self.source_name(),
                seconds: timeout.as_secs(),
            }),
        }
    }

    /// Pull with a deadline; failures are logged and turn into zero items.
    pub async fn fetch_outcome(&self, timeout: Duration) -> SourceOutcome {
        let source = self.source_name();
        match self.try_fetch(timeout).await {
            Ok(items) => SourceOutcome {
                source,
                items,
                error: None,
            },
            Err(e) => {
                warn!("Error fetching {}: {}", source, e);
                SourceOutcome {
                    source,
                    items: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub async fn fetch(&self) -> Vec<RawItem> {
        self.fetch_outcome(DEFAULT_CONNECTOR_TIMEOUT).await.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeedEndpoint, FetchConfig};
    use crate::Fetcher;
    use std::sync::Arc;

    /// A feed endpoint that accepts the connection but never answers.
    async fn silent_endpoint() -> (tokio::net::TcpListener, FeedEndpoint) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/rss", listener.local_addr().unwrap());
        (listener, FeedEndpoint::new("Silent", url))
    }

    #[tokio::test]
    async fn hanging_feed_times_out_with_zero_items() {
        let (_listener, endpoint) = silent_endpoint().await;
        let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
        let connector = SourceConnector::Feed(FeedSource::from_endpoint(&endpoint, fetcher));

        let err = connector.try_fetch(Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, IngestError::Timeout { ref source_name, .. } if source_name == "Silent"));

        let outcome = connector.fetch_outcome(Duration::from_millis(200)).await;
        assert!(outcome.items.is_empty());
        assert!(outcome.error.unwrap().contains("timed out"));
    }

    #[test]
    fn connectors_can_cross_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FeedSource>();
        assert_send_sync::<SourceConnector>();
    }

    #[tokio::test]
    async fn broken_feed_yields_zero_items() {
        let connector = SourceConnector::Feed(FeedSource::from_fixture("Broken", "this is not a feed"));
        let outcome = connector.fetch_outcome(DEFAULT_CONNECTOR_TIMEOUT).await;
        assert!(outcome.items.is_empty());
        assert!(outcome.error.is_some());
        assert_eq!(outcome.source, "Broken");
    }

    #[tokio::test]
    async fn synthetic_connector_dispatches() {
        let connector = SourceConnector::Synthetic(SyntheticSource::new(2));
        assert_eq!(connector.fetch().await.len(), 2);
    }
}
