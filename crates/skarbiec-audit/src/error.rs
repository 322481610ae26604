//! Error types for skarbiec-audit.

/// Errors surfaced by the audit run or report rendering.
///
/// Per-identity failures during the sweep are contained and logged, not
/// raised; what does surface here is unusable input (bad secret, missing
/// admin identity) and report output failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The supplied credential material or admin identity is unusable.
    #[error(transparent)]
    Auth(#[from] skarbiec_gcp_auth::AuthError),

    /// A client failure outside per-identity containment.
    #[error(transparent)]
    Client(#[from] skarbiec_client::Error),

    /// A walk aborted fatally.
    #[error(transparent)]
    Crawl(#[from] skarbiec_crawl::CrawlError),

    /// Report output failure.
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV rendering failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for skarbiec-audit operations.
pub type Result<T> = std::result::Result<T, Error>;
