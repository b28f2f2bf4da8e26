use crate::archive::ArchiveWriter;
use crate::config::PublishConfig;
use crate::marker::MarkerStore;
use crate::queue::{InMemoryQueue, ReleaseQueue};
use crate::types::{PublishOutcome, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Archives the digest and drains the release queue. Every step is a local
/// file operation, so this stays synchronous.
pub struct Publisher {
    digest_path: PathBuf,
    archive: ArchiveWriter,
    marker: MarkerStore,
    queue: Box<dyn ReleaseQueue>,
    dry_run: bool,
}

impl Publisher {
    pub fn new(config: &PublishConfig, queue: Box<dyn ReleaseQueue>) -> Self {
        Self {
            digest_path: config.digest_path.clone(),
            archive: ArchiveWriter::new(&config.archive_dir).with_retention(config.retention),
            marker: MarkerStore::new(&config.marker_path),
            queue,
            dry_run: config.dry_run,
        }
    }

    /// Publisher backed by the built-in demo queue.
    pub fn with_demo_queue(config: &PublishConfig) -> Self {
        Self::new(config, Box::new(InMemoryQueue::demo()))
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn archive_writer(&self) -> &ArchiveWriter {
        &self.archive
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn already_published(&self, window_start: DateTime<Utc>) -> Result<bool> {
        self.marker.is_published(window_start)
    }

    /// Scheduled publish for the window starting at `window_start`. Does
    /// nothing if the marker already records that window.
    pub fn publish_scheduled(
        &mut self,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> Result<PublishOutcome> {
        if self.already_published(window_start)? {
            info!("Window {} already published, skipping", window_start);
            return Ok(PublishOutcome::AlreadyPublished);
        }
        self.publish(now, Some(window_start))
    }

    /// Operator override: publish now regardless of schedule or marker.
    /// `window_start` is recorded when the run happens to fall inside a
    /// window, so a scheduler started later in that hour will not repeat it.
    pub fn publish_forced(
        &mut self,
        now: DateTime<Utc>,
        window_start: Option<DateTime<Utc>>,
    ) -> Result<PublishOutcome> {
        info!("Forced publish at {}", now);
        self.publish(now, window_start)
    }

    fn publish(&mut self, now: DateTime<Utc>, window_start: Option<DateTime<Utc>>) -> Result<PublishOutcome> {
        if !self.digest_path.is_file() {
            warn!(
                "Digest {} not found, nothing to publish",
                self.digest_path.display()
            );
            return Ok(PublishOutcome::NothingToPublish);
        }

        if self.dry_run {
            let would_archive = self.archive.would_archive(now);
            info!("[DRY-RUN] would archive {}", would_archive.display());
            let pending = self.queue.pending();
            for item in &pending {
                info!("[DRY-RUN] Would publish: {} by {}", item.content, item.user);
            }
            let queued = pending.len();
            info!("[DRY-RUN] would release {} queued entries", queued);
            return Ok(PublishOutcome::DryRun {
                would_archive,
                queued,
            });
        }

        let record = self.archive.archive(&self.digest_path, now)?;

        let mut released = 0;
        while let Some(item) = self.queue.pop_front() {
            info!("[PUBLISH] Live: {} by {}", item.content, item.user);
            released += 1;
        }

        // The record exists from here on; a lost marker must not turn into a
        // retry that archives the same window again.
        if let Some(window_start) = window_start {
            if let Err(e) = self.marker.record(window_start, now) {
                error!("Published window {} but could not record it: {}", window_start, e);
            }
        }

        info!("[PUBLISH] Released {} entries, digest archived at {}", released, record.display());
        Ok(PublishOutcome::Archived { record, released })
    }
}
