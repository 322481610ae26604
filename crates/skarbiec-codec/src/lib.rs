#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Record codec library.
//!
//! Provides:
//! - [`Schema`] — declarative description of one record shape
//! - [`RecordCodec`] — the built, shareable decode/encode mapping
//! - [`Record`] / [`FieldValue`] — immutable decoded values
//! - [`TimestampCodec`] — ISO-8601 timestamp field codec
//! - [`CodecError`] — validation errors with preserved causes

pub mod error;
pub mod record;
pub mod schema;
pub mod timestamp;

mod proptests;

pub use error::{BoxedError, CodecError, Result};
pub use record::{FieldValue, Record};
pub use schema::{FieldCodec, RecordCodec, Schema};
pub use timestamp::TimestampCodec;
