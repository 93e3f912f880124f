//! Resolved request type

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod};

/// The concrete request derived from the current session state.
///
/// Never stored: recomputed whenever a dependency changes, so two
/// derivations from the same state are always identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// HTTP method of the selected endpoint.
    pub method: HttpMethod,
    /// Fully resolved URL: base URL, substituted path, query string.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Headers,
    /// Body text, present only for body-carrying methods with a non-empty
    /// body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ResolvedRequest {
    /// Creates a body-less request.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Returns true when a body will be sent.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.body.is_some()
    }
}
