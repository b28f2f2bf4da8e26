use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::defs::StandardizedItem;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write batch to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read batch from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("batch serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes a standardized batch as a single pretty-printed JSON array.
///
/// The whole file is replaced on every save. The write is not atomic: a crash
/// halfway through can leave a truncated file at `destination`.
pub fn save(items: &[StandardizedItem], destination: &Path) -> Result<(), SinkError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SinkError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let body = serde_json::to_string_pretty(items)?;
    fs::write(destination, body).map_err(|source| SinkError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    info!("Saved {} items to {}", items.len(), destination.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<StandardizedItem>, SinkError> {
    let body = fs::read_to_string(path).map_err(|source| SinkError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::StandardizedMetadata;
    use serde_json::Map;

    fn item(id: &str) -> StandardizedItem {
        StandardizedItem {
            id: id.to_owned(),
            text: format!("text of {id}"),
            source: "Test".to_owned(),
            metadata: StandardizedMetadata {
                author: "Me".to_owned(),
                original_timestamp: 1.0,
                extra: Map::new(),
            },
        }
    }

    #[test]
    fn save_replaces_previous_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("raw_feed.json");

        save(&[item("a"), item("b"), item("c")], &path).unwrap();
        save(&[item("z")], &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, vec![item("z")]);
    }

    #[test]
    fn batch_is_pretty_printed_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_feed.json");
        save(&[item("a")], &path).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("[\n"));
        assert!(body.contains("\"original_timestamp\""));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SinkError::Read { .. }));
    }
}
