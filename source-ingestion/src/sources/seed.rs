use crate::traits::PullFeed;
use crate::types::{RawItem, Result, UNKNOWN_AUTHOR};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Pre-vetted local content, loaded from a JSON array of RawItem-shaped records.
pub struct SeedSource {
    pub path: PathBuf,
}

impl SeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Records may omit `author` and `timestamp`; the defaults are filled in
    /// here before the record is checked for the remaining required fields.
    /// A record that still fails the check is skipped on its own.
    fn records_to_items(records: Vec<Value>) -> Vec<RawItem> {
        let ingested_at = Utc::now().timestamp_millis() as f64 / 1000.0;

        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, mut record)| {
                if let Value::Object(map) = &mut record {
                    map.entry("author")
                        .or_insert_with(|| Value::from(UNKNOWN_AUTHOR));
                    map.entry("timestamp")
                        .or_insert_with(|| Value::from(ingested_at));
                }
                match RawItem::from_record(index, &record) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!("Skipping seed record: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl PullFeed for SeedSource {
    fn source_name(&self) -> String {
        "Seed".to_string()
    }

    async fn pull(&self) -> Result<Vec<RawItem>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No seed file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loading seed content from {}", self.path.display());
        let records: Vec<Value> = serde_json::from_str(&content)?;
        Ok(Self::records_to_items(records))
    }
}
