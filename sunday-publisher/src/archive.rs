use crate::types::{PublishError, Result, RetentionPolicy};
use chrono::{DateTime, Local, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RECORD_PREFIX: &str = "digest_";
const RECORD_SUFFIX: &str = ".html";
const STAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";
const STAMP_LEN: usize = "YYYY-MM-DD_HHMMSS".len();

/// Writes immutable, timestamp-named copies of the published digest.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    dir: PathBuf,
    retention: RetentionPolicy,
}

impl ArchiveWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            retention: RetentionPolicy::KeepAll,
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| PublishError::io(&self.dir, e))
    }

    /// Copy `artifact` byte-for-byte into a new record named after `now` in
    /// local time. A record from the same second is never overwritten; the
    /// new one gets a `_1`, `_2`, ... suffix instead.
    pub fn archive(&self, artifact: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let bytes = fs::read(artifact).map_err(|e| PublishError::io(artifact, e))?;
        self.ensure_dir()?;

        let stamp = stamp(now);
        let mut attempt = 0u32;
        let (path, mut file) = loop {
            let candidate = self.dir.join(record_name(&stamp, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next suffix", candidate.display());
                    attempt += 1;
                }
                Err(e) => return Err(PublishError::io(candidate, e)),
            }
        };

        if let Err(e) = file.write_all(&bytes).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(PublishError::io(&path, e));
        }
        info!("Archived {} to {}", artifact.display(), path.display());

        if let RetentionPolicy::KeepLatest(keep) = self.retention {
            if let Err(e) = self.prune(keep) {
                warn!("Retention pass failed in {}: {}", self.dir.display(), e);
            }
        }
        Ok(path)
    }

    /// The path `archive` would pick right now, without touching the disk.
    pub fn would_archive(&self, now: DateTime<Utc>) -> PathBuf {
        let stamp = stamp(now);
        (0u32..)
            .map(|attempt| self.dir.join(record_name(&stamp, attempt)))
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| self.dir.join(record_name(&stamp, 0)))
    }

    /// All archive records, oldest first.
    pub fn records(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PublishError::io(&self.dir, e)),
        };

        let mut records: Vec<((String, u32), PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PublishError::io(&self.dir, e))?;
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(record_key) {
                records.push((key, entry.path()));
            }
        }
        records.sort();
        Ok(records.into_iter().map(|(_, path)| path).collect())
    }

    fn prune(&self, keep: usize) -> Result<()> {
        let records = self.records()?;
        let excess = records.len().saturating_sub(keep);
        for old in records.into_iter().take(excess) {
            match fs::remove_file(&old) {
                Ok(()) => info!("Pruned archive record {}", old.display()),
                Err(e) => warn!("Could not prune {}: {}", old.display(), e),
            }
        }
        Ok(())
    }
}

fn stamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format(STAMP_FORMAT).to_string()
}

fn record_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{RECORD_PREFIX}{stamp}{RECORD_SUFFIX}")
    } else {
        format!("{RECORD_PREFIX}{stamp}_{attempt}{RECORD_SUFFIX}")
    }
}

/// Sort key of a record file name: its stamp, then its collision suffix.
fn record_key(name: &str) -> Option<(String, u32)> {
    let body = name.strip_prefix(RECORD_PREFIX)?.strip_suffix(RECORD_SUFFIX)?;
    if body.len() < STAMP_LEN || !body.is_char_boundary(STAMP_LEN) {
        return None;
    }
    let (stamp, rest) = body.split_at(STAMP_LEN);
    let attempt = match rest {
        "" => 0,
        _ => rest.strip_prefix('_')?.parse().ok()?,
    };
    Some((stamp.to_string(), attempt))
}
