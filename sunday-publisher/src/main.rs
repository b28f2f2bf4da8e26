use clap::Parser;
use sunday_publisher::{
    Clock, PublicationWindow, PublishConfig, PublishOutcome, Publisher, Scheduler, SystemClock,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sunday-publisher", version, about = "Releases the weekly digest on Sunday 18:00 UTC")]
struct Cli {
    /// Publish once right now, ignoring the schedule, then exit
    #[arg(long, alias = "test")]
    force: bool,

    /// Go through every decision but copy, record, and release nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = PublishConfig::from_env()?;
    config.dry_run = cli.dry_run;

    info!(
        "Starting Sunday publisher (digest: {}, archive: {}{})",
        config.digest_path.display(),
        config.archive_dir.display(),
        if config.dry_run { ", DRY-RUN" } else { "" }
    );

    let mut publisher = Publisher::with_demo_queue(&config);
    if !config.dry_run {
        if let Err(e) = publisher.archive_writer().ensure_dir() {
            error!("Cannot create archive directory: {}", e);
            return Err(e.into());
        }
    }

    if cli.force {
        let now = SystemClock.now();
        let window_start = PublicationWindow::default().window_start(now);
        match publisher.publish_forced(now, window_start) {
            Ok(PublishOutcome::NothingToPublish) => info!("Forced run finished without a digest"),
            Ok(outcome) => info!("Forced run finished: {:?}", outcome),
            Err(e) => error!("Forced publish failed: {}", e),
        }
        return Ok(());
    }

    let mut scheduler = Scheduler::new(publisher, SystemClock, &config);
    scheduler.run().await;
    Ok(())
}
