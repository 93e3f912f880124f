//! Cove Application - session engine and use cases
//!
//! This crate owns the playground's mutable session state, the pure
//! derivation of a resolved request from it, the execute-request use case
//! with timeout and cancellation, and the engine facade the presentation
//! layer drives.

pub mod engine;
pub mod error;
pub mod execute_request;
pub mod ports;
pub mod session;

pub use engine::PlaygroundEngine;
pub use error::{EngineError, SessionError};
pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult, REQUEST_TIMEOUT};
pub use ports::{CancellationReceiver, CancellationToken, HttpClient, HttpClientError};
pub use session::PlaygroundSession;
