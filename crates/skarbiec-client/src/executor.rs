//! Single-call execution with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::request::{ApiRequest, Transport, TransportError};

/// Fixed pause between transient-fault retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Cumulative transient retries allowed per call.
const MAX_RETRIES: u32 = 10;

/// How transient faults are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            backoff: RETRY_BACKOFF,
        }
    }
}

/// Executes one remote call, separating unrecoverable rejections from
/// transient faults.
///
/// A status rejection fails immediately: retrying a call the service has
/// definitively refused only masks configuration bugs. A network fault is
/// retried on a fixed interval; once the budget is spent the error carries
/// the request itself for diagnostics.
pub struct Executor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Executor {
    /// An executor over the given transport with the default policy.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute `request`, returning the raw response payload.
    pub async fn execute(&self, request: &ApiRequest, bearer: &str) -> Result<Value> {
        let mut retries = 0u32;
        loop {
            match self.transport.send(request, bearer).await {
                Ok(payload) => return Ok(payload),
                Err(TransportError::Status { status, message }) => {
                    tracing::error!(url = request.url(), status, "request rejected");
                    return Err(Error::config(format!("{status}: {message}")));
                }
                Err(TransportError::Network(source)) => {
                    if retries >= self.policy.max_retries {
                        return Err(Error::RetryExceeded {
                            attempts: retries + 1,
                            request: request.to_string(),
                        });
                    }
                    retries += 1;
                    tracing::warn!(
                        url = request.url(),
                        retry = retries,
                        %source,
                        "transport fault, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    enum Outcome {
        Succeed(Value),
        Reject(u16, &'static str),
        Drop(&'static str),
    }

    /// Transport that replays a script of outcomes and records requests.
    struct ScriptedTransport {
        script: Mutex<std::collections::VecDeque<Outcome>>,
        calls: Mutex<u32>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Outcome>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            _request: &ApiRequest,
            _bearer: &str,
        ) -> std::result::Result<Value, TransportError> {
            *self.calls.lock().unwrap() += 1;
            match self.script.lock().unwrap().pop_front() {
                Some(Outcome::Succeed(v)) => Ok(v),
                Some(Outcome::Reject(status, message)) => Err(TransportError::Status {
                    status,
                    message: message.to_owned(),
                }),
                Some(Outcome::Drop(reason)) => {
                    Err(TransportError::Network(Outcome::fault(reason)))
                }
                None => Err(TransportError::Network(Outcome::fault("script exhausted"))),
            }
        }
    }

    impl Outcome {
        fn fault(reason: &str) -> crate::error::BoxedError {
            reason.to_owned().into()
        }
    }

    fn request() -> ApiRequest {
        ApiRequest::new("https://api.example.com/files").with_param("q", "trashed = false")
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_ten_transient_faults() {
        let mut script: Vec<Outcome> = (0..10).map(|_| Outcome::Drop("reset")).collect();
        script.push(Outcome::Succeed(json!({"ok": true})));
        let transport = Arc::new(ScriptedTransport::new(script));
        let executor = Executor::new(transport.clone());

        let payload = executor.execute(&request(), "bearer").await.unwrap();

        assert_eq!(payload, json!({"ok": true}));
        assert_eq!(transport.calls(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausted_after_eleven_faults() {
        let script: Vec<Outcome> = (0..11).map(|_| Outcome::Drop("reset")).collect();
        let transport = Arc::new(ScriptedTransport::new(script));
        let executor = Executor::new(transport.clone());

        let err = executor.execute(&request(), "bearer").await.unwrap_err();

        let Error::RetryExceeded { attempts, request } = err else {
            unreachable!("expected RetryExceeded");
        };
        assert_eq!(attempts, 11);
        assert!(request.contains("https://api.example.com/files"));
        assert_eq!(transport.calls(), 11);
    }

    #[tokio::test]
    async fn test_rejection_fails_without_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![Outcome::Reject(
            403,
            "insufficient permissions",
        )]));
        let executor = Executor::new(transport.clone());

        let err = executor.execute(&request(), "bearer").await.unwrap_err();

        let Error::Config { message } = err else {
            unreachable!("expected Config");
        };
        assert!(message.contains("403"));
        assert!(message.contains("insufficient permissions"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_fault_then_rejection_is_fatal() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Outcome::Drop("reset"),
            Outcome::Reject(401, "unauthorized"),
        ]));
        let executor = Executor::new(transport.clone());

        let err = executor.execute(&request(), "bearer").await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(transport.calls(), 2);
    }
}
