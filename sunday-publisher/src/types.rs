use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One entry of the "ready to publish" release queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseItem {
    pub id: u64,
    pub content: String,
    pub user: String,
}

/// How many archive records to keep around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    #[default]
    KeepAll,
    /// Prune the oldest records beyond this many after each successful archive.
    KeepLatest(usize),
}

/// What a single publish attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Archived { record: PathBuf, released: usize },
    DryRun { would_archive: PathBuf, queued: usize },
    /// The digest artifact was absent; nothing was written.
    NothingToPublish,
    /// The durable marker already records this window.
    AlreadyPublished,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Publish marker error: {0}")]
    Marker(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

impl PublishError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
