//! Auth-specific error types.

/// Errors raised while building or connecting a credential scope.
///
/// Every variant is a configuration failure: none of them should be
/// retried, since the same inputs will fail the same way again.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The service-account secret was not valid JSON or lacked required fields.
    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    /// The embedded private key could not be used for signing.
    #[error("unusable signing key: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// No identity to impersonate: none supplied, none remembered, no default.
    #[error("no identity to impersonate")]
    MissingIdentity,

    /// The token endpoint rejected the signed assertion.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The ephemeral credential file could not be written.
    #[error("credential file error: {0}")]
    CredentialFile(#[from] std::io::Error),
}

/// Result type alias for skarbiec-gcp-auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_display() {
        assert_eq!(AuthError::MissingIdentity.to_string(), "no identity to impersonate");
    }

    #[test]
    fn test_invalid_key_display() {
        let e = AuthError::InvalidKey("missing field `client_email`".into());
        assert_eq!(
            e.to_string(),
            "invalid service account key: missing field `client_email`"
        );
    }
}
