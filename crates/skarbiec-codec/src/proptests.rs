//! Property-based tests for the codec round-trip law.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{RecordCodec, Schema, TimestampCodec};
    use chrono::DateTime;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn codec() -> RecordCodec {
        let sub = Schema::new("Sub", &["x", "y"]).build();
        Schema::new("Top", &["name", "count", "flag", "sub", "items", "at"])
            .with_nested("sub", &sub)
            .with_nested("items", &sub)
            .with_codec("at", TimestampCodec)
            .build()
    }

    fn sub_payload() -> impl Strategy<Value = Value> {
        (any::<i32>(), "[a-z]{0,8}").prop_map(|(x, y)| json!({"x": x, "y": y}))
    }

    fn timestamp() -> impl Strategy<Value = Value> {
        // Whole-second timestamps, the only form the codec round-trips exactly.
        (0i64..4_000_000_000).prop_map(|secs| {
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            Value::String(t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        })
    }

    fn payload() -> impl Strategy<Value = Value> {
        (
            proptest::option::of("[a-z]{0,12}"),
            proptest::option::of(any::<i64>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(sub_payload()),
            proptest::option::of(proptest::collection::vec(sub_payload(), 0..4)),
            proptest::option::of(timestamp()),
        )
            .prop_map(|(name, count, flag, sub, items, at)| {
                let mut map = serde_json::Map::new();
                if let Some(name) = name {
                    map.insert("name".into(), json!(name));
                }
                if let Some(count) = count {
                    map.insert("count".into(), json!(count));
                }
                if let Some(flag) = flag {
                    map.insert("flag".into(), json!(flag));
                }
                if let Some(sub) = sub {
                    map.insert("sub".into(), sub);
                }
                if let Some(items) = items {
                    map.insert("items".into(), Value::Array(items));
                }
                if let Some(at) = at {
                    map.insert("at".into(), at);
                }
                map.insert("undeclared".into(), json!("dropped"));
                Value::Object(map)
            })
    }

    proptest! {
        #[test]
        fn test_decode_encode_decode_is_identity(raw in payload()) {
            let codec = codec();
            let decoded = codec.decode(&raw).unwrap();
            let reencoded = codec.encode(&decoded).unwrap();
            prop_assert_eq!(codec.decode(&reencoded).unwrap(), decoded);
        }

        #[test]
        fn test_plain_fields_survive_decode_unchanged(raw in payload()) {
            let codec = codec();
            let decoded = codec.decode(&raw).unwrap();
            if let Some(expected) = raw.get("name") {
                prop_assert_eq!(decoded.str_field("name"), expected.as_str());
            }
            if let Some(expected) = raw.get("flag") {
                prop_assert_eq!(decoded.bool_field("flag"), expected.as_bool());
            }
        }

        #[test]
        fn test_timestamps_reencode_to_wire_string(raw in payload()) {
            let codec = codec();
            let decoded = codec.decode(&raw).unwrap();
            let reencoded = codec.encode(&decoded).unwrap();
            if let Some(original) = raw.get("at") {
                prop_assert_eq!(reencoded.get("at").unwrap(), original);
            }
        }
    }
}
