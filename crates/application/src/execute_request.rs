//! Execute-request use case
//!
//! Performs the one live network call for the playground, racing the
//! transport against cancellation and a fixed wall-clock budget. Exactly
//! one branch settles; the losing tasks are dropped, which cancels them.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use cove_domain::{RequestErrorKind, RequestLifecycle, ResolvedRequest, ResponseRecord};

use crate::ports::{CancellationReceiver, HttpClient, HttpClientError};

/// Wall-clock budget for a single playground request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for request execution.
pub type ExecuteResult = Result<ResponseRecord, ExecuteRequestError>;

/// Failures of the execute-request use case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// The resolved URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// The resolved URL has no usable scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport reported a failure.
    #[error("{0}")]
    Http(#[from] HttpClientError),
}

impl ExecuteRequestError {
    /// Maps the failure onto the lifecycle's error taxonomy.
    #[must_use]
    pub const fn kind(&self) -> RequestErrorKind {
        match self {
            Self::EmptyUrl | Self::InvalidUrl(_) => RequestErrorKind::Transport,
            Self::Http(e) => e.kind(),
        }
    }

    /// Converts the failure into a terminal lifecycle state.
    #[must_use]
    pub fn to_lifecycle(&self) -> RequestLifecycle {
        RequestLifecycle::failed(self.kind(), self.to_string())
    }
}

/// Use case that performs one live request.
///
/// Holds the transport behind its port so tests can substitute scripted
/// clients for the real adapter.
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
    timeout: Duration,
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates the use case with the standard 30-second budget.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the time budget. Intended for tests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the time budget in place. Intended for tests.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Executes the request without external cancellation.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation, transport or timeout
    /// failures.
    pub async fn execute(&self, request: &ResolvedRequest) -> ExecuteResult {
        self.validate(request)?;

        tokio::select! {
            result = self.client.execute(request) => {
                result.map_err(ExecuteRequestError::from)
            }
            () = tokio::time::sleep(self.timeout) => Err(self.timeout_error()),
        }
    }

    /// Executes the request, racing it against `cancel` and the budget.
    ///
    /// First to finish wins: a cancelled or timed-out call's transport
    /// future is dropped, aborting the underlying I/O.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation, transport, timeout or
    /// cancellation failures.
    pub async fn execute_with_cancellation(
        &self,
        request: &ResolvedRequest,
        mut cancel: CancellationReceiver,
    ) -> ExecuteResult {
        self.validate(request)?;

        tokio::select! {
            result = self.client.execute(request) => {
                result.map_err(ExecuteRequestError::from)
            }
            () = cancel.cancelled() => {
                Err(ExecuteRequestError::Http(HttpClientError::Cancelled))
            }
            () = tokio::time::sleep(self.timeout) => Err(self.timeout_error()),
        }
    }

    fn timeout_error(&self) -> ExecuteRequestError {
        ExecuteRequestError::Http(HttpClientError::Timeout {
            timeout_secs: self.timeout.as_secs(),
        })
    }

    fn validate(&self, request: &ResolvedRequest) -> Result<(), ExecuteRequestError> {
        if request.url.trim().is_empty() {
            return Err(ExecuteRequestError::EmptyUrl);
        }
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(ExecuteRequestError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::CancellationToken;
    use cove_domain::HttpMethod;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;

    /// Scripted transport: replays a fixed outcome, optionally after a
    /// delay.
    struct MockHttpClient {
        response: Result<ResponseRecord, HttpClientError>,
        delay: Option<Duration>,
    }

    impl MockHttpClient {
        fn ok() -> Self {
            Self {
                response: Ok(ResponseRecord::new(
                    200,
                    HashMap::new(),
                    "pong".to_string(),
                    5,
                )),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok()
            }
        }

        fn failing(error: HttpClientError) -> Self {
            Self {
                response: Err(error),
                delay: None,
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            _request: &ResolvedRequest,
        ) -> Pin<Box<dyn Future<Output = Result<ResponseRecord, HttpClientError>> + Send + '_>>
        {
            let response = self.response.clone();
            let delay = self.delay;
            Box::pin(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            })
        }
    }

    fn ping_request() -> ResolvedRequest {
        ResolvedRequest::new(HttpMethod::Get, "https://api.example.com/ping")
    }

    #[tokio::test]
    async fn returns_the_transport_response() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::ok()));
        let response = use_case.execute(&ping_request()).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn rejects_an_empty_url() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::ok()));
        let request = ResolvedRequest::new(HttpMethod::Get, "");
        let result = use_case.execute(&request).await;
        assert!(matches!(result, Err(ExecuteRequestError::EmptyUrl)));
    }

    #[tokio::test]
    async fn rejects_a_schemeless_url() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::ok()));
        let request = ResolvedRequest::new(HttpMethod::Get, "api.example.com/ping");
        let result = use_case.execute(&request).await;
        assert!(matches!(result, Err(ExecuteRequestError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn a_slow_transport_hits_the_timeout() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::slow(Duration::from_secs(5))))
            .with_timeout(Duration::from_millis(30));

        let result = use_case.execute(&ping_request()).await;
        assert!(matches!(
            result,
            Err(ExecuteRequestError::Http(HttpClientError::Timeout { .. }))
        ));
    }

    #[tokio::test]
    async fn cancellation_beats_the_transport() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::slow(Duration::from_secs(5))));
        let (token, receiver) = CancellationToken::new();
        token.cancel();

        let result = use_case
            .execute_with_cancellation(&ping_request(), receiver)
            .await;
        assert!(matches!(
            result,
            Err(ExecuteRequestError::Http(HttpClientError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn transport_failures_pass_through() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::failing(
            HttpClientError::Transport("connection refused".to_string()),
        )));

        let result = use_case.execute(&ping_request()).await;
        let error = result.unwrap_err();
        assert_eq!(error.kind(), RequestErrorKind::Transport);
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn timeout_failure_keeps_the_exact_message() {
        let error = ExecuteRequestError::Http(HttpClientError::Timeout { timeout_secs: 30 });
        assert_eq!(error.to_string(), "Request timed out after 30 seconds");

        let lifecycle = error.to_lifecycle();
        assert_eq!(
            lifecycle.failure(),
            Some((
                RequestErrorKind::Timeout,
                "Request timed out after 30 seconds"
            ))
        );
    }
}
