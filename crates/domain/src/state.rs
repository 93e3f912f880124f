//! Request lifecycle state machine
//!
//! Idle -> InFlight -> Completed | Failed -> Idle. One instance per
//! playground session; the presentation layer binds directly to it to pick
//! what the response pane shows.

use serde::{Deserialize, Serialize};

use crate::response::ResponseRecord;

/// Execution status of the session's current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestLifecycle {
    /// Nothing in flight and nothing to show. Also the state after an
    /// endpoint switch or a cancel.
    #[default]
    Idle,

    /// A request has been dispatched and has not yet settled.
    InFlight,

    /// The last request produced a response, whatever its status code.
    Completed {
        /// The recorded response.
        response: Box<ResponseRecord>,
    },

    /// The last request failed before producing a response.
    Failed {
        /// Failure category.
        kind: RequestErrorKind,
        /// Human-readable message for the response pane.
        message: String,
    },
}

impl RequestLifecycle {
    /// Creates a Completed state from a response record.
    #[must_use]
    pub fn completed(response: ResponseRecord) -> Self {
        Self::Completed {
            response: Box::new(response),
        }
    }

    /// Creates a Failed state.
    #[must_use]
    pub fn failed(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true while a request is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Returns true if the last request completed with a response.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns true if the last request failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The recorded response, if completed.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseRecord> {
        match self {
            Self::Completed { response } => Some(response),
            _ => None,
        }
    }

    /// The failure category and message, if failed.
    #[must_use]
    pub fn failure(&self) -> Option<(RequestErrorKind, &str)> {
        match self {
            Self::Failed { kind, message } => Some((*kind, message.as_str())),
            _ => None,
        }
    }
}

/// Failure categories for user-facing display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestErrorKind {
    /// The request exceeded its wall-clock budget.
    Timeout,

    /// DNS, connection, TLS or any other transport failure.
    Transport,

    /// The request body was not valid JSON.
    InvalidBody,

    /// The attempt was cancelled before settling.
    Cancelled,
}
