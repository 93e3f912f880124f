//! Playground engine facade
//!
//! What the presentation layer drives: session edits, snapshot reads and a
//! single-flight `execute`. Only the newest attempt may publish its
//! outcome; anything superseded or cancelled settles silently.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use cove_domain::{
    CodeLanguage, ConfigError, EndpointDescriptor, PlaygroundConfig, RequestLifecycle,
    ResolvedRequest,
};

use crate::error::{EngineError, SessionError};
use crate::execute_request::ExecuteRequest;
use crate::ports::{CancellationToken, HttpClient};
use crate::session::PlaygroundSession;

/// Engine owning one playground session and its request execution.
///
/// All mutation funnels through short critical sections on the session
/// mutex; no lock is ever held across an await point.
pub struct PlaygroundEngine<C: HttpClient> {
    session: Mutex<PlaygroundSession>,
    executor: ExecuteRequest<C>,
    epoch: AtomicU64,
    inflight: Mutex<Option<CancellationToken>>,
}

impl<C: HttpClient> PlaygroundEngine<C> {
    /// Validates the config and builds an engine around `client`.
    ///
    /// # Errors
    ///
    /// Returns the configuration error verbatim; a malformed config never
    /// yields a usable engine.
    pub fn new(config: PlaygroundConfig, client: Arc<C>) -> Result<Self, ConfigError> {
        Ok(Self {
            session: Mutex::new(PlaygroundSession::new(config)?),
            executor: ExecuteRequest::new(client),
            epoch: AtomicU64::new(0),
            inflight: Mutex::new(None),
        })
    }

    /// Overrides the request time budget. Intended for tests.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.executor.set_timeout(timeout);
        self
    }

    /// Switches the active endpoint, discarding any outstanding attempt:
    /// its result targeted the old endpoint and must never publish.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EndpointOutOfRange`] for an invalid index;
    /// nothing is cancelled in that case.
    pub fn select_endpoint(&self, index: usize) -> Result<(), SessionError> {
        let mut session = self.session.lock();
        session.select_endpoint(index)?;
        self.discard_inflight();
        Ok(())
    }

    /// Upserts a path/query parameter value.
    pub fn set_param(&self, name: impl Into<String>, value: impl Into<String>) {
        self.session.lock().set_param(name, value);
    }

    /// Upserts a header value.
    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.session.lock().set_header(name, value);
    }

    /// Replaces the body text verbatim.
    pub fn set_body(&self, text: impl Into<String>) {
        self.session.lock().set_body(text);
    }

    /// Switches the code-generation target.
    pub fn select_language(&self, language: CodeLanguage) {
        self.session.lock().select_language(language);
    }

    /// Selected code-generation target.
    #[must_use]
    pub fn language(&self) -> CodeLanguage {
        self.session.lock().language()
    }

    /// Snapshot of the selected endpoint descriptor.
    #[must_use]
    pub fn endpoint(&self) -> EndpointDescriptor {
        self.session.lock().endpoint().clone()
    }

    /// Snapshot of the current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> RequestLifecycle {
        self.session.lock().lifecycle().clone()
    }

    /// Resolves the request URL from the current state.
    #[must_use]
    pub fn build_url(&self) -> String {
        self.session.lock().build_url()
    }

    /// Derives the concrete request from the current state. The code pane
    /// feeds this to the snippet generator on every relevant change.
    #[must_use]
    pub fn resolved_request(&self) -> ResolvedRequest {
        self.session.lock().resolved_request()
    }

    /// True when the send action should be enabled.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.session.lock().can_execute()
    }

    /// Executes the current request.
    ///
    /// An invalid JSON body blocks the call without touching the
    /// lifecycle. A call issued while another is outstanding cancels the
    /// outstanding one first, synchronously; the superseded attempt's
    /// settlement is discarded. Whatever happens, an attempt that is still
    /// current clears the in-flight marker when it settles.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBody`] when the JSON gate rejects the
    /// body. Transport and timeout failures are not errors here; they
    /// land in the lifecycle as `Failed`.
    pub async fn execute(&self) -> Result<(), EngineError> {
        let (attempt, resolved, receiver) = {
            let mut session = self.session.lock();
            if !session.body_is_valid_json() {
                return Err(EngineError::InvalidBody);
            }
            session.begin_request();
            let resolved = session.resolved_request();

            // claiming the epoch and replacing the token under the session
            // lock serializes competing executes: the superseded attempt is
            // cancelled before this one reaches the transport
            let attempt = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            let mut inflight = self.inflight.lock();
            if let Some(previous) = inflight.take() {
                previous.cancel();
            }
            let (token, receiver) = CancellationToken::new();
            *inflight = Some(token);
            (attempt, resolved, receiver)
        };

        tracing::debug!(
            attempt,
            method = %resolved.method,
            url = %resolved.url,
            "dispatching request"
        );

        let outcome = self
            .executor
            .execute_with_cancellation(&resolved, receiver)
            .await;

        {
            // the staleness check must share the critical section with the
            // publish, or a discard racing this settlement could lose
            let mut session = self.session.lock();
            if self.epoch.load(Ordering::SeqCst) != attempt {
                tracing::debug!(attempt, "discarding superseded result");
                return Ok(());
            }
            match outcome {
                Ok(response) => {
                    tracing::debug!(
                        attempt,
                        status = response.status,
                        elapsed_ms = response.elapsed_ms,
                        "request completed"
                    );
                    session.complete_request(response);
                }
                Err(error) => {
                    tracing::debug!(attempt, %error, "request failed");
                    session.fail_request(error.kind(), error.to_string());
                }
            }
            // still current, so the stored token is ours: clear the marker
            // whatever the outcome was
            *self.inflight.lock() = None;
        }
        Ok(())
    }

    /// Cancels any outstanding attempt (cancel button or widget unmount).
    ///
    /// The attempt's eventual settlement is discarded, and an in-flight
    /// lifecycle returns to Idle.
    pub fn cancel(&self) {
        let mut session = self.session.lock();
        self.discard_inflight();
        if session.lifecycle().is_in_flight() {
            session.reset_lifecycle();
        }
    }

    /// Bumps the epoch and cancels the outstanding token, so the attempt
    /// can neither keep running nor publish. Callers hold the session
    /// lock, which orders the bump against any settling attempt.
    fn discard_inflight(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let token = self.inflight.lock().take();
        if let Some(token) = token {
            token.cancel();
        }
    }
}

impl<C: HttpClient> Drop for PlaygroundEngine<C> {
    fn drop(&mut self) {
        let token = self.inflight.lock().take();
        if let Some(token) = token {
            token.cancel();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use cove_domain::{
        HttpMethod, ParamKind, ParameterSpec, RequestErrorKind, ResponseRecord,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;

    /// Transport whose n-th call returns status `200 + n` after the n-th
    /// configured delay.
    struct SequencedClient {
        delays_ms: Vec<u64>,
        calls: AtomicU64,
    }

    impl SequencedClient {
        fn new(delays_ms: Vec<u64>) -> Self {
            Self {
                delays_ms,
                calls: AtomicU64::new(0),
            }
        }
    }

    impl HttpClient for SequencedClient {
        fn execute(
            &self,
            _request: &ResolvedRequest,
        ) -> Pin<Box<dyn Future<Output = Result<ResponseRecord, HttpClientError>> + Send + '_>>
        {
            let call = usize::try_from(self.calls.fetch_add(1, Ordering::SeqCst)).unwrap();
            let delay = self.delays_ms.get(call).copied().unwrap_or(0);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let status = 200 + u16::try_from(call).unwrap();
                Ok(ResponseRecord::new(
                    status,
                    HashMap::new(),
                    format!("call-{call}"),
                    delay,
                ))
            })
        }
    }

    fn config() -> PlaygroundConfig {
        let mut get_ping = EndpointDescriptor::new(HttpMethod::Get, "/ping");
        get_ping.params.query = vec![ParameterSpec::new("verbose", ParamKind::Boolean)];
        let create = EndpointDescriptor::new(HttpMethod::Post, "/users");
        PlaygroundConfig {
            base_url: "https://api.example.com".to_string(),
            endpoints: vec![get_ping, create],
            default_api_key: None,
            api_key_header: None,
        }
    }

    fn engine(delays_ms: Vec<u64>) -> Arc<PlaygroundEngine<SequencedClient>> {
        Arc::new(
            PlaygroundEngine::new(config(), Arc::new(SequencedClient::new(delays_ms))).unwrap(),
        )
    }

    #[tokio::test]
    async fn execute_publishes_the_response() {
        let engine = engine(vec![0]);
        engine.execute().await.unwrap();

        let lifecycle = engine.lifecycle();
        assert_eq!(lifecycle.response().map(|r| r.status), Some(200));
    }

    #[tokio::test]
    async fn invalid_body_blocks_execute_without_state_change() {
        let engine = engine(vec![0]);
        engine.select_endpoint(1).unwrap();
        engine.set_body("{not json");

        assert!(!engine.can_execute());
        let result = engine.execute().await;
        assert_eq!(result, Err(EngineError::InvalidBody));
        assert!(engine.lifecycle().is_idle());
    }

    #[tokio::test]
    async fn a_second_execute_supersedes_the_first() {
        let engine = engine(vec![500, 10]);

        let slow = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.execute().await })
        };
        // let the first attempt reach its transport call
        tokio::time::sleep(Duration::from_millis(50)).await;

        engine.execute().await.unwrap();
        slow.await.unwrap().unwrap();

        // only the second call's outcome is visible
        let lifecycle = engine.lifecycle();
        assert_eq!(lifecycle.response().map(|r| r.status), Some(201));
    }

    #[tokio::test]
    async fn cancel_returns_the_session_to_idle() {
        let engine = engine(vec![500]);

        let handle = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.execute().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(engine.lifecycle().is_in_flight());

        engine.cancel();
        assert!(engine.lifecycle().is_idle());

        handle.await.unwrap().unwrap();
        // the cancelled attempt's settlement was discarded
        assert!(engine.lifecycle().is_idle());
    }

    #[tokio::test]
    async fn switching_endpoints_discards_the_outstanding_attempt() {
        let engine = engine(vec![500]);

        let handle = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.execute().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        engine.select_endpoint(1).unwrap();
        assert!(engine.lifecycle().is_idle());

        handle.await.unwrap().unwrap();
        assert!(engine.lifecycle().is_idle());
    }

    #[tokio::test]
    async fn timeout_surfaces_the_specific_failure() {
        let engine_slow = Arc::new(
            PlaygroundEngine::new(config(), Arc::new(SequencedClient::new(vec![5_000])))
                .unwrap()
                .with_request_timeout(Duration::from_millis(40)),
        );

        engine_slow.execute().await.unwrap();

        let lifecycle = engine_slow.lifecycle();
        let (kind, message) = lifecycle.failure().unwrap();
        assert_eq!(kind, RequestErrorKind::Timeout);
        assert!(message.contains("timed out"));
    }

    #[tokio::test]
    async fn code_pane_inputs_track_session_edits() {
        let engine = engine(vec![0]);
        engine.set_param("verbose", "true");
        engine.set_header("X-Trace", "1");
        engine.select_language(CodeLanguage::Python);

        let request = engine.resolved_request();
        assert_eq!(request.url, "https://api.example.com/ping?verbose=true");
        assert_eq!(request.headers.get("X-Trace"), Some("1"));
        assert_eq!(engine.language(), CodeLanguage::Python);
    }
}
