//! Application error types

use thiserror::Error;

/// Errors from session state operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `select_endpoint` was called with an index outside the endpoint
    /// list. A caller bug: the endpoint picker only offers valid indices.
    #[error("endpoint index {index} out of range (0..{len})")]
    EndpointOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of configured endpoints.
        len: usize,
    },
}

/// Errors the engine reports to the presentation layer without touching the
/// request lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The body text is not valid JSON; the send action stays disabled and
    /// the form shows an inline indicator.
    #[error("request body is not valid JSON")]
    InvalidBody,

    /// A session state operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
