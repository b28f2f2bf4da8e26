use crate::types::{RawItem, StandardizedItem};
use interfaces::SchemaError;
use serde_json::Value;
use tracing::debug;

/// Map raw items one-to-one onto the canonical shape, keeping order.
///
/// `content` becomes `text`; author and timestamp move under `metadata`, and
/// `raw_metadata` is carried over untouched as `metadata.extra`.
pub fn standardize(items: &[RawItem]) -> Vec<StandardizedItem> {
    let standardized: Vec<StandardizedItem> = items.iter().map(StandardizedItem::from).collect();
    debug!("Standardized {} items", standardized.len());
    standardized
}

/// Standardize untyped records, e.g. JSON handed over by another stage.
///
/// Fails on the first record missing `id`, `content`, `source`, `author` or
/// `timestamp`. That is an upstream contract breach and the run should abort.
pub fn standardize_records(records: &[Value]) -> Result<Vec<StandardizedItem>, SchemaError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| RawItem::from_record(index, record).map(StandardizedItem::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn raw(id: &str, source: &str, metadata: Value) -> RawItem {
        RawItem {
            id: id.to_string(),
            source: source.to_string(),
            content: format!("content {id}"),
            author: "Me".to_string(),
            timestamp: 1234567890.0,
            raw_metadata: metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn standardization_maps_every_field() {
        let input = vec![raw("123", "Test", json!({"foo": "bar", "nested": {"n": 1}}))];
        let out = standardize(&input);

        assert_eq!(out.len(), 1);
        let item = &out[0];
        assert_eq!(item.id, "123");
        assert_eq!(item.source, "Test");
        assert_eq!(item.text, "content 123");
        assert_eq!(item.metadata.author, "Me");
        assert_eq!(item.metadata.original_timestamp, 1234567890.0);
        assert_eq!(item.metadata.extra, input[0].raw_metadata);
    }

    #[test]
    fn order_and_duplicate_ids_are_preserved() {
        let input = vec![
            raw("a", "Seed", json!({})),
            raw("b", "Feed", json!({})),
            raw("a", "Feed", json!({"link": "x"})),
        ];
        let ids: Vec<_> = standardize(&input).into_iter().map(|i| (i.id, i.source)).collect();
        assert_eq!(
            ids,
            vec![
                ("a".to_string(), "Seed".to_string()),
                ("b".to_string(), "Feed".to_string()),
                ("a".to_string(), "Feed".to_string()),
            ]
        );
    }

    #[test]
    fn empty_batch_is_fine() {
        assert!(standardize(&[]).is_empty());
    }

    #[test]
    fn untyped_record_without_content_is_rejected() {
        let records = vec![
            json!({"id": "1", "source": "s", "content": "c", "author": "a", "timestamp": 1.0}),
            json!({"id": "2", "source": "s", "author": "a", "timestamp": 1.0}),
        ];
        let err = standardize_records(&records).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { index: 1, field: "content" });
    }

    #[test]
    fn untyped_records_keep_source_specific_fields() {
        let records = vec![json!({
            "id": "1", "source": "s", "content": "c", "author": "a", "timestamp": 2.5,
            "raw_metadata": {"link": "https://x"}
        })];
        let out = standardize_records(&records).unwrap();
        let mut expected = Map::new();
        expected.insert("link".to_string(), json!("https://x"));
        assert_eq!(out[0].metadata.extra, expected);
        assert_eq!(out[0].metadata.original_timestamp, 2.5);
    }
}
