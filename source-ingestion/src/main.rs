use source_ingestion::{pipeline, IngestConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting source ingestion");

    let config = IngestConfig::from_env();
    info!(
        "Seed file: {}, batch file: {}, {} feeds configured",
        config.seed_path.display(),
        config.batch_path.display(),
        config.feeds.len()
    );

    let aggregator = pipeline::build_aggregator(&config);

    match pipeline::run_once(&aggregator, &config).await {
        Ok(report) => {
            for (source, count) in &report.counts {
                info!("  {}: {}", source, count);
            }
            Ok(())
        }
        Err(e) => {
            error!("Failed to save batch to {}: {}", config.batch_path.display(), e);
            Err(e.into())
        }
    }
}
