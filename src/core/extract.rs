use crate::core::jsonp::unwrap_jsonp;
use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

pub const DEFAULT_RECORDS_KEY: &str = "events";

/// Records carried by a parsed payload.
///
/// A top-level array is the record list itself; an object contributes its
/// `records_key` member when that member is an array. Any other shape
/// contributes nothing.
pub fn records_from_payload(payload: Value, records_key: &str) -> Vec<Record> {
    match payload {
        Value::Array(items) => items.into_iter().map(Record::new).collect(),
        Value::Object(mut obj) => match obj.remove(records_key) {
            Some(Value::Array(items)) => items.into_iter().map(Record::new).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Unwraps and parses one feed body.
pub fn parse_feed(body: &str, callback: &str, records_key: &str) -> Result<Vec<Record>> {
    let payload: Value = serde_json::from_str(unwrap_jsonp(body, callback))
        .map_err(|source| EtlError::PayloadParseError { source })?;
    Ok(records_from_payload(payload, records_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::jsonp::DEFAULT_CALLBACK;
    use serde_json::json;

    #[test]
    fn test_events_member_is_extracted() {
        let records = parse_feed(
            r#"widgetCallback({"events":[{"id":5}]});"#,
            DEFAULT_CALLBACK,
            DEFAULT_RECORDS_KEY,
        )
        .unwrap();
        assert_eq!(records, vec![Record::new(json!({"id": 5}))]);
    }

    #[test]
    fn test_top_level_array_is_the_record_list() {
        let records = parse_feed(
            "widgetCallback([{\"id\":1},{\"id\":2}]);\n",
            DEFAULT_CALLBACK,
            DEFAULT_RECORDS_KEY,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].data["id"], json!(2));
    }

    #[test]
    fn test_not_json_is_parse_error() {
        let err = parse_feed("not-json-at-all", DEFAULT_CALLBACK, DEFAULT_RECORDS_KEY).unwrap_err();
        assert!(matches!(err, EtlError::PayloadParseError { .. }));
    }

    #[test]
    fn test_unexpected_shapes_yield_no_records() {
        for payload in [
            json!({"items": [{"id": 1}]}),
            json!({"events": {"id": 1}}),
            json!({"events": null}),
            json!("events"),
            json!(42),
            json!(null),
        ] {
            assert!(records_from_payload(payload, DEFAULT_RECORDS_KEY).is_empty());
        }
    }

    #[test]
    fn test_custom_records_key() {
        let records = records_from_payload(json!({"shows": [{"id": 1}]}), "shows");
        assert_eq!(records.len(), 1);
    }
}
