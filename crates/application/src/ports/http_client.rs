//! HTTP client port and cancellation primitives

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::watch;

use cove_domain::{RequestErrorKind, ResolvedRequest, ResponseRecord};

/// Transport-level failures, normalized away from any concrete client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed or used.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request exceeded its time budget.
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The budget that elapsed, in whole seconds.
        timeout_secs: u64,
    },

    /// The attempt was cancelled before settling.
    #[error("Request cancelled")]
    Cancelled,

    /// DNS, connection, TLS or any other transport failure.
    #[error("{0}")]
    Transport(String),
}

impl HttpClientError {
    /// Maps the failure onto the lifecycle's error taxonomy.
    #[must_use]
    pub const fn kind(&self) -> RequestErrorKind {
        match self {
            Self::Timeout { .. } => RequestErrorKind::Timeout,
            Self::Cancelled => RequestErrorKind::Cancelled,
            Self::InvalidUrl(_) | Self::Transport(_) => RequestErrorKind::Transport,
        }
    }
}

/// Port for executing HTTP requests.
///
/// Object-safe so tests can slot in scripted fakes; the returned future
/// borrows the client, matching how adapters hold their connection pool.
pub trait HttpClient: Send + Sync {
    /// Executes the resolved request and produces a response record.
    fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseRecord, HttpClientError>> + Send + '_>>;
}

/// Handle used to cancel an in-flight execution.
#[derive(Debug)]
pub struct CancellationToken {
    tx: watch::Sender<bool>,
}

/// Receiving half, awaited inside the execution race.
#[derive(Debug)]
pub struct CancellationReceiver {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a connected token/receiver pair.
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancellationReceiver { rx })
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancellationReceiver {
    /// Resolves once the paired token is cancelled.
    ///
    /// A token dropped without cancelling never resolves this future; the
    /// execution race then settles through one of its other branches.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
