//! Error types for skarbiec-client.

use skarbiec_codec::CodecError;
use skarbiec_gcp_auth::AuthError;

/// Boxed transport fault cause.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by remote API operations.
///
/// The split matters for retry behavior: a [`Error::Config`] means the
/// call can never succeed as issued (bad authorization, bad query) and
/// retrying would only mask the real problem, while [`Error::Transport`]
/// is a transient fault worth retrying during a long crawl.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The service rejected the call; wraps the server's message.
    #[error("configuration error: {message}")]
    Config {
        /// The server's rejection, status code included.
        message: String,
    },

    /// A network or transport-layer fault; the call may succeed if retried.
    #[error("transport fault: {source}")]
    Transport {
        /// The underlying fault.
        #[source]
        source: BoxedError,
    },

    /// The transient-retry budget was exhausted.
    #[error("retry budget exhausted after {attempts} attempts: {request}")]
    RetryExceeded {
        /// Total attempts made, the first call included.
        attempts: u32,
        /// The request that kept failing, for diagnostics.
        request: String,
    },

    /// A payload failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The credential scope could not be (re)opened.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl Error {
    /// Creates a configuration error from a server rejection.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether retrying the same call could change the outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// Result type alias for skarbiec-client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let e = Error::config("403: insufficient permissions");
        assert_eq!(e.to_string(), "configuration error: 403: insufficient permissions");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Transport { source: "reset".into() }.is_retryable());
        assert!(!Error::config("denied").is_retryable());
        assert!(
            !Error::RetryExceeded { attempts: 11, request: "GET /files".into() }.is_retryable()
        );
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
