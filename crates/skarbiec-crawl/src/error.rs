//! Error types for skarbiec-crawl.

use skarbiec_client::Error as ClientError;

/// A failed attempt to list a container's children, classified by blast
/// radius.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The children couldn't be listed, but the walk can continue: this
    /// container's subtree simply contributes no results.
    #[error("subtree unavailable: {source}")]
    Unavailable {
        /// The underlying listing failure.
        #[source]
        source: ClientError,
    },

    /// The walk cannot meaningfully continue (retry budget spent,
    /// credential scope dead).
    #[error("listing aborted: {source}")]
    Fatal {
        /// The underlying listing failure.
        #[source]
        source: ClientError,
    },
}

impl From<ClientError> for ListError {
    /// A service rejection or a malformed payload degrades one subtree;
    /// everything else means the identity's crawl is over.
    fn from(source: ClientError) -> Self {
        match source {
            ClientError::Config { .. } | ClientError::Codec(_) => {
                ListError::Unavailable { source }
            }
            _ => ListError::Fatal { source },
        }
    }
}

/// A walk aborted below `path` by a fatal listing failure.
#[derive(Debug, thiserror::Error)]
#[error("crawl aborted at '{path}': {source}")]
pub struct CrawlError {
    /// Path of the container whose listing failed.
    pub path: String,
    /// The underlying failure.
    #[source]
    pub source: ClientError,
}
