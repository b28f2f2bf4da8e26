use crate::aggregator::{Aggregator, IngestReport};
use crate::config::IngestConfig;
use crate::normalizer::standardize;
use crate::sources::{FeedSource, SeedSource, SyntheticSource};
use crate::types::Result;
use crate::Fetcher;
use std::sync::Arc;
use tracing::{info, warn};

/// Wire the connectors described by `config` into an aggregator. Without an
/// HTTP client the feeds are left out and the run goes on with the rest.
pub fn build_aggregator(config: &IngestConfig) -> Aggregator {
    let mut aggregator = Aggregator::new(SyntheticSource::new(config.synthetic_count))
        .with_seed(SeedSource::new(&config.seed_path))
        .with_connector_timeout(config.connector_timeout);

    match Fetcher::new(config.fetch.clone()) {
        Ok(fetcher) => {
            let fetcher = Arc::new(fetcher);
            for endpoint in &config.feeds {
                aggregator.add_feed(FeedSource::from_endpoint(endpoint, fetcher.clone()));
            }
        }
        Err(e) => warn!("HTTP client unavailable, skipping {} feeds: {}", config.feeds.len(), e),
    }

    aggregator
}

/// One ingestion run: collect, standardize, persist.
///
/// Source failures are absorbed by the aggregator; only the final save can
/// fail the run.
pub async fn run_once(aggregator: &Aggregator, config: &IngestConfig) -> Result<IngestReport> {
    let (raw_items, report) = aggregator.collect_report().await;

    for (source, error) in &report.failed_sources {
        warn!("Source {} contributed nothing: {}", source, error);
    }

    let standardized = standardize(&raw_items);
    interfaces::state::save(&standardized, &config.batch_path)?;

    info!(
        "Ingestion finished: {} items from {} sources (synthetic fill: {})",
        report.total,
        report.counts.len(),
        report.synthetic_fill
    );
    Ok(report)
}
