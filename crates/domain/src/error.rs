//! Domain error types

use thiserror::Error;

/// Errors raised when a playground configuration fails validation.
///
/// These are fatal: initialization stops and no session is ever
/// constructed from a config carrying any of them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `baseUrl` is missing or blank.
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    /// The endpoint list is empty.
    #[error("at least one endpoint is required")]
    NoEndpoints,

    /// An endpoint declares an empty path template.
    #[error("endpoint {index}: path must not be empty")]
    EmptyPath {
        /// Position of the offending endpoint.
        index: usize,
    },

    /// A parameter name appears in both the path and query groups of one
    /// endpoint, which would make its value ambiguous.
    #[error("endpoint {index}: parameter `{name}` declared in both path and query")]
    DuplicateParamName {
        /// Position of the offending endpoint.
        index: usize,
        /// The colliding parameter name.
        name: String,
    },

    /// The HTTP method string is not one the playground supports.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The JSON document could not be deserialized at all.
    #[error("malformed playground config: {0}")]
    Malformed(String),
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
