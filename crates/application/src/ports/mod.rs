//! Port definitions (interfaces)
//!
//! Ports define the boundary between the playground engine and external
//! systems. The only external system the engine needs is an HTTP transport.

mod http_client;

pub use http_client::{CancellationReceiver, CancellationToken, HttpClient, HttpClientError};
