//! Schema declarations and the built codec.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{BoxedError, CodecError, Result};
use crate::record::{FieldValue, Record};

/// A per-field decode/encode pair for scalar transformations.
///
/// The codec is only invoked for fields that are present and non-null in
/// the payload; absent and null fields decode to [`FieldValue::Null`]
/// without consulting it. `encode` must be the inverse of `decode` for
/// every value `decode` can produce.
pub trait FieldCodec: Send + Sync {
    /// Decode a present, non-null JSON value.
    fn decode(&self, raw: &Value) -> std::result::Result<FieldValue, BoxedError>;

    /// Encode a decoded value back into its JSON representation.
    fn encode(&self, value: &FieldValue) -> std::result::Result<Value, BoxedError>;
}

#[derive(Clone)]
enum FieldKind {
    Plain,
    Nested(RecordCodec),
    Codec(Arc<dyn FieldCodec>),
}

#[derive(Clone)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
}

/// A declarative description of one record shape: a type name and an
/// ordered list of declared fields.
///
/// By default every field is a passthrough. [`Schema::with_nested`]
/// attaches a sub-codec that is applied recursively, to a single object
/// or element-wise over an array; [`Schema::with_codec`] attaches a
/// scalar [`FieldCodec`]. Build once with [`Schema::build`] and share
/// the resulting [`RecordCodec`] by reference wherever decode/encode is
/// needed.
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Declare a new schema with the given type name and field list.
    pub fn new(name: &'static str, fields: &[&'static str]) -> Self {
        Self {
            name,
            fields: fields
                .iter()
                .map(|name| FieldSpec {
                    name,
                    kind: FieldKind::Plain,
                })
                .collect(),
        }
    }

    /// Declare `field` as a nested record (or sequence of records)
    /// decoded by `nested`.
    pub fn with_nested(mut self, field: &'static str, nested: &RecordCodec) -> Self {
        self.set_kind(field, FieldKind::Nested(nested.clone()));
        self
    }

    /// Attach a scalar [`FieldCodec`] to `field`.
    pub fn with_codec(mut self, field: &'static str, codec: impl FieldCodec + 'static) -> Self {
        self.set_kind(field, FieldKind::Codec(Arc::new(codec)));
        self
    }

    /// Freeze the declaration into a shareable codec.
    pub fn build(self) -> RecordCodec {
        RecordCodec(Arc::new(self))
    }

    fn set_kind(&mut self, field: &'static str, kind: FieldKind) {
        let spec = self.fields.iter_mut().find(|f| f.name == field);
        debug_assert!(spec.is_some(), "field '{field}' is not declared on '{}'", self.name);
        if let Some(spec) = spec {
            spec.kind = kind;
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The built, immutable decode/encode mapping for one record shape.
///
/// Cloning is cheap (shared reference); a codec built at startup can be
/// handed to every component that touches the corresponding payloads.
#[derive(Clone)]
pub struct RecordCodec(Arc<Schema>);

impl RecordCodec {
    /// The declared type name.
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Decode a raw payload into a [`Record`].
    ///
    /// Every declared field is read from the payload; absent keys and
    /// JSON nulls become [`FieldValue::Null`]. Keys not declared on the
    /// schema are silently dropped: decoding is a lossy projection onto
    /// the declared fields.
    pub fn decode(&self, raw: &Value) -> Result<Record> {
        let Value::Object(map) = raw else {
            return Err(CodecError::NotAnObject {
                type_name: self.0.name,
                got: json_kind(raw),
            });
        };

        let mut values = Vec::with_capacity(self.0.fields.len());
        for spec in &self.0.fields {
            let value = match map.get(spec.name) {
                None | Some(Value::Null) => FieldValue::Null,
                Some(present) => self.decode_field(spec, present)?,
            };
            values.push(value);
        }
        Ok(Record::new(self.clone(), values))
    }

    /// Encode a decoded record back into a raw payload.
    ///
    /// The inverse of [`RecordCodec::decode`]: the output carries only
    /// declared fields, and null fields are omitted.
    pub fn encode(&self, record: &Record) -> Result<Value> {
        if record.type_name() != self.0.name {
            return Err(CodecError::SchemaMismatch {
                expected: self.0.name,
                got: record.type_name(),
            });
        }

        let mut map = Map::new();
        for (spec, value) in self.0.fields.iter().zip(record.values()) {
            if value.is_null() {
                continue;
            }
            map.insert(spec.name.to_string(), self.encode_field(spec, value)?);
        }
        Ok(Value::Object(map))
    }

    pub(crate) fn field_index(&self, field: &str) -> Option<usize> {
        self.0.fields.iter().position(|f| f.name == field)
    }

    fn decode_field(&self, spec: &FieldSpec, raw: &Value) -> Result<FieldValue> {
        match &spec.kind {
            FieldKind::Plain => Ok(FieldValue::Raw(raw.clone())),
            FieldKind::Codec(codec) => {
                codec.decode(raw).map_err(|source| CodecError::Field {
                    type_name: self.0.name,
                    field: spec.name,
                    source,
                })
            }
            FieldKind::Nested(nested) => match raw {
                Value::Object(_) => Ok(FieldValue::Record(nested.decode(raw)?)),
                Value::Array(items) => {
                    let mut records = Vec::with_capacity(items.len());
                    for item in items {
                        records.push(nested.decode(item)?);
                    }
                    Ok(FieldValue::Records(records))
                }
                other => Err(CodecError::UnexpectedShape {
                    type_name: self.0.name,
                    field: spec.name,
                    expected: "object or array",
                    got: json_kind(other),
                }),
            },
        }
    }

    fn encode_field(&self, spec: &FieldSpec, value: &FieldValue) -> Result<Value> {
        match (&spec.kind, value) {
            (FieldKind::Plain, FieldValue::Raw(v)) => Ok(v.clone()),
            (FieldKind::Codec(codec), v) => {
                codec.encode(v).map_err(|source| CodecError::Field {
                    type_name: self.0.name,
                    field: spec.name,
                    source,
                })
            }
            (FieldKind::Nested(nested), FieldValue::Record(r)) => nested.encode(r),
            (FieldKind::Nested(nested), FieldValue::Records(rs)) => Ok(Value::Array(
                rs.iter().map(|r| nested.encode(r)).collect::<Result<_>>()?,
            )),
            (_, other) => Err(CodecError::UnexpectedShape {
                type_name: self.0.name,
                field: spec.name,
                expected: "a value matching the field declaration",
                got: other.kind_name(),
            }),
        }
    }
}

impl fmt::Debug for RecordCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordCodec").field(&self.0.name).finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
