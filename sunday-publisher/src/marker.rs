use crate::types::{PublishError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMarker {
    pub last_published_window: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// Durable record of the last window that was published, kept as a small
/// JSON file so a restarted scheduler does not fire twice in one window.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no publish has been recorded yet.
    pub fn load(&self) -> Result<Option<PublishMarker>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PublishError::io(&self.path, e)),
        };
        let marker = serde_json::from_slice(&bytes).map_err(|e| {
            PublishError::Marker(format!("{} is not a valid marker: {}", self.path.display(), e))
        })?;
        Ok(Some(marker))
    }

    pub fn is_published(&self, window_start: DateTime<Utc>) -> Result<bool> {
        Ok(self
            .load()?
            .is_some_and(|marker| marker.last_published_window == window_start))
    }

    /// Replace the marker. Written to a sibling temp file and renamed so a
    /// crash never leaves a half-written marker behind.
    pub fn record(&self, window_start: DateTime<Utc>, published_at: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PublishError::io(parent, e))?;
        }

        let marker = PublishMarker {
            last_published_window: window_start,
            published_at,
        };
        let json = serde_json::to_string_pretty(&marker)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| PublishError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PublishError::io(&self.path, e))?;

        debug!("Recorded publish marker for window {}", window_start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_marker_means_nothing_published() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarkerStore::new(dir.path().join(".last_published.json"));
        let window = Utc.with_ymd_and_hms(2024, 10, 6, 18, 0, 0).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.is_published(window).unwrap());
    }

    #[test]
    fn recorded_window_survives_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".last_published.json");
        let window = Utc.with_ymd_and_hms(2024, 10, 6, 18, 0, 0).unwrap();
        let next_week = Utc.with_ymd_and_hms(2024, 10, 13, 18, 0, 0).unwrap();

        MarkerStore::new(&path)
            .record(window, window + chrono::Duration::minutes(3))
            .unwrap();

        let reopened = MarkerStore::new(&path);
        assert!(reopened.is_published(window).unwrap());
        assert!(!reopened.is_published(next_week).unwrap());
    }

    #[test]
    fn corrupt_marker_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".last_published.json");
        fs::write(&path, "not json").unwrap();

        let err = MarkerStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PublishError::Marker(_)));
    }
}
