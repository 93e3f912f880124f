//! Cove Domain - core playground types
//!
//! This crate defines the data model for the Cove API playground:
//! endpoint descriptors, the playground configuration, resolved requests,
//! response records and the request lifecycle. All types here are pure
//! Rust with no I/O dependencies.

pub mod codegen;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod response;
pub mod state;

pub use codegen::CodeLanguage;
pub use config::PlaygroundConfig;
pub use endpoint::{EndpointDescriptor, ParamKind, ParamValue, ParameterGroups, ParameterSpec};
pub use error::{ConfigError, ConfigResult};
pub use request::{Header, Headers, HttpMethod, ResolvedRequest};
pub use response::{ResponseBody, ResponseRecord, StatusCode};
pub use state::{RequestErrorKind, RequestLifecycle};
