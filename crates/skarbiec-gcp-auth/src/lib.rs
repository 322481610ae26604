#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Credential scope management.
//!
//! Provides:
//! - [`ServiceAccountKey`] — the parsed service-account secret
//! - [`CredentialScope`] — ephemeral per-identity credential material and
//!   the authenticated handle built from it
//! - [`AuthError`] — fatal, non-retryable configuration failures

pub mod error;
mod key;
mod scope;

pub use error::{AuthError, Result};
pub use key::ServiceAccountKey;
pub use scope::{AuthorizedHandle, CredentialScope};

/// Read-only scope for the directory user listing API.
pub const DIRECTORY_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/admin.directory.user.readonly";

/// Read-only scope for the drive API.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
