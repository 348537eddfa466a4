//! # Serialization Normalizer
//!
//! Converts store-native documents into plain JSON. Object identifiers become
//! their 24-hex string form and timestamps become ISO-8601 strings, at any
//! nesting depth. Applied to every document a read returns; write results
//! carry only counts and skip this entirely.

use bson::{Bson, Document};
use serde_json::{Map, Value};

/// Normalize a whole document into a JSON object.
pub fn normalize_document(doc: Document) -> Value {
    let mut out = Map::with_capacity(doc.len());
    for (key, value) in doc {
        out.insert(key, normalize_bson(value));
    }
    Value::Object(out)
}

/// Normalize a single BSON value into JSON.
///
/// Scalars pass through natively; documents and arrays are recursed. BSON
/// types with no JSON counterpart other than identifiers and timestamps
/// (binary, regex, ...) fall back to relaxed extended JSON.
pub fn normalize_bson(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => normalize_document(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(normalize_bson).collect()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(dt.to_chrono().to_rfc3339()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::Number(n.into()),
        Bson::Int64(n) => Value::Number(n.into()),
        Bson::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Null => Value::Null,
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use bson::{doc, DateTime};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_object_id_becomes_hex_string() {
        let oid = ObjectId::new();
        let value = normalize_document(doc! {"_id": oid});
        assert_eq!(value["_id"], Value::String(oid.to_hex()));
    }

    #[test]
    fn test_datetime_becomes_iso8601_string() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        let value = normalize_document(doc! {"seen_at": DateTime::from_chrono(instant)});
        let rendered = value["seen_at"].as_str().unwrap();
        assert!(rendered.starts_with("2024-05-17T09:30:00"));
        // Round-trips through chrono's ISO-8601 parser.
        let parsed = chrono::DateTime::parse_from_rfc3339(rendered).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), instant);
    }

    #[test]
    fn test_nested_structures_are_recursed() {
        let oid = ObjectId::new();
        let value = normalize_document(doc! {
            "meta": {"owner": oid, "tags": ["a", {"ref": oid}]},
            "counts": [1_i64, 2_i64],
        });
        assert_eq!(value["meta"]["owner"], Value::String(oid.to_hex()));
        assert_eq!(value["meta"]["tags"][0], Value::String("a".into()));
        assert_eq!(value["meta"]["tags"][1]["ref"], Value::String(oid.to_hex()));
        assert_eq!(value["counts"][0], Value::Number(1.into()));
    }

    #[test]
    fn test_scalars_pass_through() {
        let value = normalize_document(doc! {
            "name": "x",
            "active": true,
            "count": 7_i32,
            "score": 1.5_f64,
            "missing": Bson::Null,
        });
        assert_eq!(value["name"], Value::String("x".into()));
        assert_eq!(value["active"], Value::Bool(true));
        assert_eq!(value["count"], Value::Number(7.into()));
        assert_eq!(value["score"].as_f64(), Some(1.5));
        assert_eq!(value["missing"], Value::Null);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let oid = ObjectId::new();
        let instant = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let once = normalize_document(doc! {
            "_id": oid,
            "seen_at": DateTime::from_chrono(instant),
            "nested": {"id": oid, "list": [oid]},
        });

        // Re-ingesting the normalized JSON (now all strings) and normalizing
        // again must change nothing.
        let reparsed: Document = bson::to_document(&once).unwrap();
        let twice = normalize_document(reparsed);
        assert_eq!(once, twice);
    }
}
