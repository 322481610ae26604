//! Requests and the wire transport seam.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BoxedError;

/// One GET call against a listing endpoint: a URL plus query parameters.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    url: String,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// A request with no parameters yet.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// Append one query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// The request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The query parameters, in append order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        for (i, (name, value)) in self.query.iter().enumerate() {
            write!(f, "{}{name}={value}", if i == 0 { '?' } else { '&' })?;
        }
        Ok(())
    }
}

/// A failed transport attempt, classified for the retry policy.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service answered with an error status, an API-semantic
    /// rejection that will not succeed on retry.
    #[error("{status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The call never completed: connection, timeout, or body fault.
    #[error("network fault: {0}")]
    Network(#[source] BoxedError),
}

/// The wire seam: executes one request and returns the raw JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request with the given bearer token.
    async fn send(&self, request: &ApiRequest, bearer: &str) -> Result<Value, TransportError>;
}

/// The production transport over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// A transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest, bearer: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(request.url())
            .query(request.query())
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Network(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_display_includes_query() {
        let request = ApiRequest::new("https://api.example.com/files")
            .with_param("q", "trashed = false")
            .with_param("pageToken", "t1");
        assert_eq!(
            request.to_string(),
            "https://api.example.com/files?q=trashed = false&pageToken=t1"
        );
    }

    #[test]
    fn test_request_display_without_query() {
        let request = ApiRequest::new("https://api.example.com/files");
        assert_eq!(request.to_string(), "https://api.example.com/files");
    }
}
