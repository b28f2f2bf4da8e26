use crate::sources::{
    FeedSource, SeedSource, SourceConnector, SourceOutcome, SyntheticSource, DEFAULT_CONNECTOR_TIMEOUT,
};
use crate::types::{RawItem, LOW_VOLUME_THRESHOLD};
use std::time::Duration;
use tracing::info;

/// Per-run summary of which connectors contributed what.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// `(source, item count)` in the order the connectors ran.
    pub counts: Vec<(String, usize)>,
    pub failed_sources: Vec<(String, String)>,
    pub synthetic_fill: bool,
    pub total: usize,
}

pub struct Aggregator {
    seed: Option<SourceConnector>,
    feeds: Vec<SourceConnector>,
    synthetic: SourceConnector,
    connector_timeout: Duration,
}

impl Aggregator {
    pub fn new(synthetic: SyntheticSource) -> Self {
        Self {
            seed: None,
            feeds: Vec::new(),
            synthetic: SourceConnector::Synthetic(synthetic),
            connector_timeout: DEFAULT_CONNECTOR_TIMEOUT,
        }
    }

    pub fn with_seed(mut self, seed: SeedSource) -> Self {
        self.seed = Some(SourceConnector::Seed(seed));
        self
    }

    pub fn add_feed(&mut self, feed: FeedSource) {
        info!("Adding feed to aggregator: {}", feed.name);
        self.feeds.push(SourceConnector::Feed(feed));
    }

    pub fn with_connector_timeout(mut self, timeout: Duration) -> Self {
        self.connector_timeout = timeout;
        self
    }

    pub async fn collect(&self) -> Vec<RawItem> {
        self.collect_report().await.0
    }

    /// Seed first, then every feed in configuration order, then synthetic
    /// filler only when the first two produced fewer than
    /// [`LOW_VOLUME_THRESHOLD`] items. No step short-circuits another.
    pub async fn collect_report(&self) -> (Vec<RawItem>, IngestReport) {
        info!("Starting data ingestion");
        let mut all_items = Vec::new();
        let mut report = IngestReport::default();

        if let Some(seed) = &self.seed {
            let outcome = seed.fetch_outcome(self.connector_timeout).await;
            absorb(outcome, &mut all_items, &mut report);
        }

        for feed in &self.feeds {
            let outcome = feed.fetch_outcome(self.connector_timeout).await;
            absorb(outcome, &mut all_items, &mut report);
        }

        if all_items.len() < LOW_VOLUME_THRESHOLD {
            info!("Low data volume ({} items). Generating mock data.", all_items.len());
            let outcome = self.synthetic.fetch_outcome(self.connector_timeout).await;
            report.synthetic_fill = true;
            absorb(outcome, &mut all_items, &mut report);
        }

        report.total = all_items.len();
        info!("Total items fetched: {}", report.total);
        (all_items, report)
    }
}

fn absorb(outcome: SourceOutcome, all_items: &mut Vec<RawItem>, report: &mut IngestReport) {
    report.counts.push((outcome.source.clone(), outcome.items.len()));
    if let Some(error) = outcome.error {
        report.failed_sources.push((outcome.source, error));
    }
    all_items.extend(outcome.items);
}
