#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Remote API client library.
//!
//! Provides:
//! - [`Error`] — the fatal/transient failure taxonomy
//! - [`Transport`] / [`HttpTransport`] — the wire seam
//! - [`Executor`] — one remote call with bounded retry
//! - [`drain_pages`] — cursor pagination into one ordered sequence
//! - [`DriveClient`] / [`DirectoryClient`] — the two API surfaces
//! - [`DriveSchemas`] / [`DirectorySchemas`] — payload codecs, built once

pub mod directory;
pub mod drive;
pub mod error;
pub mod executor;
pub mod paginate;
pub mod request;
pub mod schemas;

pub use directory::DirectoryClient;
pub use drive::{DriveClient, FileQuery};
pub use error::{Error, Result};
pub use executor::{Executor, RetryPolicy};
pub use paginate::{Page, drain_pages};
pub use request::{ApiRequest, HttpTransport, Transport, TransportError};
pub use schemas::{DirectorySchemas, DriveSchemas, FOLDER_MIME_TYPE};

/// Client construction options.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API base URLs.
    pub endpoints: ApiEndpoints,
    /// Directory for ephemeral credential files; the scope's default
    /// (the current directory) when unset.
    pub credential_dir: Option<std::path::PathBuf>,
}

/// Base URLs for the two API surfaces. Overridable for tests.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    /// Drive v3 base URL.
    pub drive_base: String,
    /// Directory v1 base URL.
    pub directory_base: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            drive_base: "https://www.googleapis.com/drive/v3".to_owned(),
            directory_base: "https://admin.googleapis.com/admin/directory/v1".to_owned(),
        }
    }
}
