//! Error types for skarbiec-codec.

/// Boxed error used to carry arbitrary per-field codec failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while decoding or encoding a payload against a schema.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The top-level payload for a record was not a JSON object.
    #[error("payload for {type_name} is not a JSON object (got {got})")]
    NotAnObject {
        /// Name of the record type being decoded.
        type_name: &'static str,
        /// JSON kind that was actually present.
        got: &'static str,
    },

    /// A field's payload did not have the shape its declaration requires.
    #[error("{type_name}.{field}: expected {expected}, got {got}")]
    UnexpectedShape {
        /// Name of the record type being decoded or encoded.
        type_name: &'static str,
        /// The offending field.
        field: &'static str,
        /// What the field declaration requires.
        expected: &'static str,
        /// What was actually present.
        got: &'static str,
    },

    /// A per-field codec failed; the original cause is preserved.
    #[error("{type_name}.{field}: {source}")]
    Field {
        /// Name of the record type being decoded or encoded.
        type_name: &'static str,
        /// The offending field.
        field: &'static str,
        /// The underlying codec failure.
        #[source]
        source: BoxedError,
    },

    /// A record was encoded through a codec it was not decoded by.
    #[error("record of type {got} passed to codec for {expected}")]
    SchemaMismatch {
        /// The codec's record type.
        expected: &'static str,
        /// The record's actual type.
        got: &'static str,
    },
}

/// Result type alias for skarbiec-codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_shape_display() {
        let e = CodecError::UnexpectedShape {
            type_name: "DriveFile",
            field: "owners",
            expected: "object or array",
            got: "number",
        };
        assert_eq!(e.to_string(), "DriveFile.owners: expected object or array, got number");
    }

    #[test]
    fn test_field_error_preserves_cause() {
        let cause: BoxedError = "bad timestamp".into();
        let e = CodecError::Field {
            type_name: "DriveFile",
            field: "createdTime",
            source: cause,
        };
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.to_string(), "DriveFile.createdTime: bad timestamp");
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodecError>();
    }
}
