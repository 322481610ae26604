//! Decoded record values.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::schema::RecordCodec;

/// One decoded field of a [`Record`].
///
/// Declared-but-absent fields and JSON nulls both decode to [`FieldValue::Null`];
/// the two are not distinguished, and null fields are omitted again on encode.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or JSON null.
    Null,
    /// A passthrough JSON value (no per-field codec declared).
    Raw(Value),
    /// A timestamp decoded by a field codec.
    Time(DateTime<Utc>),
    /// A single nested record.
    Record(Record),
    /// A sequence of nested records.
    Records(Vec<Record>),
}

impl FieldValue {
    /// String content, if this is a raw JSON string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Raw(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a raw JSON boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Raw(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Decoded timestamp, if present.
    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Time(t) => Some(t),
            _ => None,
        }
    }

    /// The nested record, if present.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The nested record sequence; empty when the field is null or scalar.
    pub fn as_records(&self) -> &[Record] {
        match self {
            FieldValue::Records(rs) => rs,
            _ => &[],
        }
    }

    /// Whether the field was absent or null in the source payload.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Raw(_) => "raw value",
            FieldValue::Time(_) => "timestamp",
            FieldValue::Record(_) => "record",
            FieldValue::Records(_) => "record list",
        }
    }
}

/// An immutable decoded record: the declared fields of one schema, in
/// declaration order.
///
/// Records remember the codec that produced them, so field lookup and
/// re-encoding need no external state. Equality is field-wise structural
/// equality.
#[derive(Debug, Clone)]
pub struct Record {
    codec: RecordCodec,
    values: Vec<FieldValue>,
}

impl Record {
    pub(crate) fn new(codec: RecordCodec, values: Vec<FieldValue>) -> Self {
        Self { codec, values }
    }

    /// The record's declared type name.
    pub fn type_name(&self) -> &'static str {
        self.codec.name()
    }

    /// The codec this record was decoded by.
    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    /// Look up a declared field. Returns `None` for undeclared names.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.codec.field_index(field).map(|i| &self.values[i])
    }

    /// String content of a declared field, if it holds a raw JSON string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Boolean content of a declared field, if it holds a raw JSON boolean.
    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Decoded timestamp of a declared field, if present.
    pub fn time_field(&self, field: &str) -> Option<&DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_time)
    }

    /// Nested record held by a declared field, if present.
    pub fn record(&self, field: &str) -> Option<&Record> {
        self.get(field).and_then(FieldValue::as_record)
    }

    /// Nested record sequence held by a declared field; empty when the
    /// field is null, absent, or not a sequence.
    pub fn records(&self, field: &str) -> &[Record] {
        self.get(field).map(FieldValue::as_records).unwrap_or(&[])
    }

    /// Encode this record back into a raw payload via its own codec.
    pub fn encode(&self) -> Result<Value> {
        self.codec.encode(self)
    }

    pub(crate) fn values(&self) -> &[FieldValue] {
        &self.values
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.values == other.values
    }
}
