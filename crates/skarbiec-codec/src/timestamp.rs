//! ISO-8601 timestamp field codec.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::BoxedError;
use crate::record::FieldValue;
use crate::schema::FieldCodec;

/// Field codec mapping RFC 3339 timestamp strings to [`FieldValue::Time`].
///
/// Re-encoding renders `%Y-%m-%dT%H:%M:%SZ`, so whole-second UTC `Z`
/// timestamps round-trip to the exact wire string. Offset timestamps are
/// normalised to UTC on decode.
pub struct TimestampCodec;

impl FieldCodec for TimestampCodec {
    fn decode(&self, raw: &Value) -> Result<FieldValue, BoxedError> {
        let Value::String(text) = raw else {
            return Err(format!("expected a timestamp string, got {raw}").into());
        };
        let parsed = DateTime::parse_from_rfc3339(text)?;
        Ok(FieldValue::Time(parsed.with_timezone(&Utc)))
    }

    fn encode(&self, value: &FieldValue) -> Result<Value, BoxedError> {
        match value {
            FieldValue::Time(t) => Ok(Value::String(
                t.to_rfc3339_opts(SecondsFormat::Secs, true),
            )),
            other => Err(format!("expected a decoded timestamp, got {}", other.kind_name()).into()),
        }
    }
}
