//! Playground configuration
//!
//! The root input of one playground widget, embedded as a JSON block in the
//! documentation sidebar config. Loading is fail-fast: a block that breaks
//! any invariant is rejected here, never deferred to first use.

use serde::{Deserialize, Serialize};

use crate::endpoint::EndpointDescriptor;
use crate::error::{ConfigError, ConfigResult};

/// Root configuration for a playground widget instance. Immutable for the
/// lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundConfig {
    /// Origin plus base path prepended to every endpoint path.
    pub base_url: String,
    /// Described endpoints, in sidebar order.
    pub endpoints: Vec<EndpointDescriptor>,
    /// Optional API key used to seed an auth header on session creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_api_key: Option<String>,
    /// Header the API key is seeded into. Defaults to `Authorization`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_header: Option<String>,
}

impl PlaygroundConfig {
    /// Parses and validates a playground block from its JSON source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the document does not
    /// deserialize, or the specific validation error otherwise.
    pub fn from_json(source: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants every session relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: empty base URL, empty endpoint
    /// list, an endpoint with an empty path, or a parameter name shared
    /// between the path and query groups of one endpoint.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if endpoint.path.trim().is_empty() {
                return Err(ConfigError::EmptyPath { index });
            }
            for path_param in &endpoint.params.path {
                let collides = endpoint
                    .params
                    .query
                    .iter()
                    .any(|q| q.name == path_param.name);
                if collides {
                    return Err(ConfigError::DuplicateParamName {
                        index,
                        name: path_param.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
