use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Fields every raw record must carry before it can be standardized.
pub const REQUIRED_FIELDS: [&str; 5] = ["id", "content", "source", "author", "timestamp"];

/// `raw_metadata` key holding top-level record fields whose names were
/// already taken inside `raw_metadata`.
pub const RECORD_FIELDS_KEY: &str = "record_fields";

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_owned()
}

/// A content unit as produced by a single source, before normalization.
///
/// `id` is only unique within its `source`. `timestamp` is epoch seconds taken
/// from the source's own clock, or from the ingestion clock when the source
/// has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub source: String,
    pub content: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    pub timestamp: f64,
    #[serde(default)]
    pub raw_metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedMetadata {
    pub author: String,
    pub original_timestamp: f64,
    /// Every source-specific field without a canonical slot.
    pub extra: Map<String, Value>,
}

/// The canonical record written to the batch file and consumed by the
/// filtering stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedItem {
    pub id: String,
    pub text: String,
    pub source: String,
    pub metadata: StandardizedMetadata,
}

impl From<&RawItem> for StandardizedItem {
    fn from(item: &RawItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.content.clone(),
            source: item.source.clone(),
            metadata: StandardizedMetadata {
                author: item.author.clone(),
                original_timestamp: item.timestamp,
                extra: item.raw_metadata.clone(),
            },
        }
    }
}

impl From<RawItem> for StandardizedItem {
    fn from(item: RawItem) -> Self {
        Self {
            id: item.id,
            text: item.content,
            source: item.source,
            metadata: StandardizedMetadata {
                author: item.author,
                original_timestamp: item.timestamp,
                extra: item.raw_metadata,
            },
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index} has an invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

impl RawItem {
    /// Build a `RawItem` from an untyped record, checking every required field.
    ///
    /// Keys other than the canonical ones are folded into `raw_metadata` so
    /// nothing the source sent is lost.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, SchemaError> {
        let object = record.as_object().ok_or(SchemaError::NotAnObject { index })?;

        for field in REQUIRED_FIELDS {
            if object.get(field).is_none_or(Value::is_null) {
                return Err(SchemaError::MissingField { index, field });
            }
        }

        let text = |field: &'static str| -> Result<String, SchemaError> {
            match &object[field] {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(SchemaError::InvalidField {
                    index,
                    field,
                    reason: format!("expected a string, found {other}"),
                }),
            }
        };

        let timestamp = object["timestamp"].as_f64().ok_or_else(|| SchemaError::InvalidField {
            index,
            field: "timestamp",
            reason: "expected epoch seconds".to_owned(),
        })?;

        let mut raw_metadata = match object.get("raw_metadata") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => Map::from_iter([("raw_metadata".to_owned(), other.clone())]),
        };

        // Top-level extras never overwrite what the source put in raw_metadata.
        let mut clashing = Map::new();
        for (key, value) in object {
            if REQUIRED_FIELDS.contains(&key.as_str()) || key == "raw_metadata" {
                continue;
            }
            if raw_metadata.contains_key(key) {
                clashing.insert(key.clone(), value.clone());
            } else {
                raw_metadata.insert(key.clone(), value.clone());
            }
        }
        if !clashing.is_empty() {
            let slot = (0..)
                .map(|n| match n {
                    0 => RECORD_FIELDS_KEY.to_owned(),
                    n => format!("{RECORD_FIELDS_KEY}_{n}"),
                })
                .find(|slot| !raw_metadata.contains_key(slot))
                .unwrap_or_else(|| RECORD_FIELDS_KEY.to_owned());
            raw_metadata.insert(slot, Value::Object(clashing));
        }

        Ok(Self {
            id: text("id")?,
            source: text("source")?,
            content: text("content")?,
            author: text("author")?,
            timestamp,
            raw_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_with_every_field_converts() {
        let record = json!({
            "id": "123",
            "source": "Test",
            "content": "Hello World",
            "author": "Me",
            "timestamp": 1234567890.0,
            "raw_metadata": {"foo": "bar"}
        });
        let item = RawItem::from_record(0, &record).unwrap();
        assert_eq!(item.id, "123");
        assert_eq!(item.author, "Me");
        assert_eq!(item.raw_metadata["foo"], "bar");
    }

    #[test]
    fn missing_timestamp_is_reported_by_name() {
        let record = json!({"id": "1", "source": "s", "content": "c", "author": "a"});
        let err = RawItem::from_record(4, &record).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { index: 4, field: "timestamp" });
    }

    #[test]
    fn unknown_keys_land_in_raw_metadata() {
        let record = json!({
            "id": "1", "source": "s", "content": "c", "author": "a",
            "timestamp": 1, "likes": 42
        });
        let item = RawItem::from_record(0, &record).unwrap();
        assert_eq!(item.raw_metadata["likes"], 42);
        assert!(item.raw_metadata.get("id").is_none());
    }

    #[test]
    fn top_level_keys_do_not_overwrite_raw_metadata() {
        let record = json!({
            "id": "1", "source": "s", "content": "c", "author": "a", "timestamp": 1,
            "raw_metadata": {"link": "https://inner", "score": 3},
            "link": "https://outer", "lang": "fr"
        });
        let item = RawItem::from_record(0, &record).unwrap();
        assert_eq!(item.raw_metadata["link"], "https://inner");
        assert_eq!(item.raw_metadata["score"], 3);
        assert_eq!(item.raw_metadata["lang"], "fr");
        assert_eq!(item.raw_metadata[RECORD_FIELDS_KEY]["link"], "https://outer");
    }

    #[test]
    fn non_object_raw_metadata_is_kept() {
        let record = json!({
            "id": "1", "source": "s", "content": "c", "author": "a", "timestamp": 1,
            "raw_metadata": ["tag-a", "tag-b"]
        });
        let item = RawItem::from_record(0, &record).unwrap();
        assert_eq!(item.raw_metadata["raw_metadata"], json!(["tag-a", "tag-b"]));
    }

    #[test]
    fn seed_shaped_json_defaults_author() {
        let item: RawItem = serde_json::from_value(json!({
            "id": "seed_1", "source": "Seed", "content": "c", "timestamp": 10.5
        }))
        .unwrap();
        assert_eq!(item.author, UNKNOWN_AUTHOR);
        assert!(item.raw_metadata.is_empty());
    }
}
