//! Playground session state engine
//!
//! Single source of truth for one widget's in-progress request
//! configuration, and the pure derivation of a resolved request from it.
//! Nothing here touches the network; execution lives in the engine.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::form_urlencoded;

use cove_domain::{
    CodeLanguage, ConfigError, EndpointDescriptor, Headers, ParamValue, PlaygroundConfig,
    RequestErrorKind, RequestLifecycle, ResolvedRequest, ResponseRecord,
};

use crate::error::SessionError;

/// Characters escaped when substituting a value into a path segment.
/// Everything but alphanumerics and `- _ . ! ~ * ' ( )`, mirroring
/// component-style percent-encoding.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Header the API key is seeded into when the config names none.
const DEFAULT_API_KEY_HEADER: &str = "Authorization";

/// Mutable state of one playground widget instance.
///
/// Created when the widget mounts, destroyed when it unmounts; nothing
/// survives a reload. Parameter values are stored as raw strings; type
/// coercion happens at URL-build and code-generation time.
#[derive(Debug, Clone)]
pub struct PlaygroundSession {
    config: PlaygroundConfig,
    selected_endpoint: usize,
    param_values: HashMap<String, String>,
    header_values: Headers,
    body_text: String,
    language: CodeLanguage,
    lifecycle: RequestLifecycle,
}

impl PlaygroundSession {
    /// Validates the config and creates a session on its first endpoint.
    ///
    /// Seeds `header_values` from the configured API key and
    /// `param_values` from the first endpoint's declared defaults.
    ///
    /// # Errors
    ///
    /// Returns the configuration error verbatim; no session exists on
    /// failure.
    pub fn new(config: PlaygroundConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut header_values = Headers::new();
        if let Some(key) = &config.default_api_key {
            let name = config
                .api_key_header
                .as_deref()
                .unwrap_or(DEFAULT_API_KEY_HEADER);
            header_values.set(name, format!("Bearer {key}"));
        }

        let mut session = Self {
            config,
            selected_endpoint: 0,
            param_values: HashMap::new(),
            header_values,
            body_text: String::new(),
            language: CodeLanguage::default(),
            lifecycle: RequestLifecycle::Idle,
        };
        session.seed_defaults();
        Ok(session)
    }

    /// The immutable session configuration.
    #[must_use]
    pub const fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// The currently selected endpoint descriptor.
    #[must_use]
    pub fn endpoint(&self) -> &EndpointDescriptor {
        &self.config.endpoints[self.selected_endpoint]
    }

    /// Index of the selected endpoint.
    #[must_use]
    pub const fn selected_endpoint(&self) -> usize {
        self.selected_endpoint
    }

    /// Switches the active endpoint.
    ///
    /// Nothing carries over: parameters reset to the new endpoint's
    /// declared defaults, the body clears and the lifecycle returns to
    /// Idle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EndpointOutOfRange`] for an index outside
    /// the configured endpoint list.
    pub fn select_endpoint(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.config.endpoints.len();
        if index >= len {
            return Err(SessionError::EndpointOutOfRange { index, len });
        }
        self.selected_endpoint = index;
        self.seed_defaults();
        self.body_text.clear();
        self.lifecycle = RequestLifecycle::Idle;
        Ok(())
    }

    /// Replaces `param_values` with the selected endpoint's declared
    /// defaults. Parameters without a default are absent, not empty.
    fn seed_defaults(&mut self) {
        self.param_values.clear();
        let endpoint = &self.config.endpoints[self.selected_endpoint];
        for param in endpoint.params.path.iter().chain(&endpoint.params.query) {
            if let Some(default) = &param.default {
                self.param_values
                    .insert(param.name.clone(), default.to_field_value());
            }
        }
    }

    /// Upserts a path/query parameter value.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.param_values.insert(name.into(), value.into());
    }

    /// Current value of a parameter, if set.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.param_values.get(name).map(String::as_str)
    }

    /// Upserts a header value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.header_values.set(name, value);
    }

    /// Headers in insertion order.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.header_values
    }

    /// Replaces the body text verbatim.
    pub fn set_body(&mut self, text: impl Into<String>) {
        self.body_text = text.into();
    }

    /// Current body text.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Switches the code-generation target.
    pub fn select_language(&mut self, language: CodeLanguage) {
        self.language = language;
    }

    /// Selected code-generation target.
    #[must_use]
    pub const fn language(&self) -> CodeLanguage {
        self.language
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    /// True when the body is empty or parses as JSON.
    #[must_use]
    pub fn body_is_valid_json(&self) -> bool {
        self.body_text.trim().is_empty()
            || serde_json::from_str::<serde_json::Value>(&self.body_text).is_ok()
    }

    /// True when the send action should be enabled.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.body_is_valid_json()
    }

    /// Resolves the request URL from the current state.
    ///
    /// Pure: repeated calls with unchanged state yield identical output.
    /// Path placeholders substitute the current value, then the declared
    /// default, then the empty string. Query parameters append in
    /// declaration order via form-encoding; empty or unset values are
    /// omitted entirely, and no `?` appears when nothing is appended.
    #[must_use]
    pub fn build_url(&self) -> String {
        let endpoint = self.endpoint();
        let mut url = format!("{}{}", self.config.base_url, endpoint.path);

        for param in &endpoint.params.path {
            let value = self
                .param_values
                .get(&param.name)
                .cloned()
                .or_else(|| param.default.as_ref().map(ParamValue::to_field_value))
                .unwrap_or_default();
            let encoded = utf8_percent_encode(&value, COMPONENT).to_string();
            url = url.replace(&format!("{{{}}}", param.name), &encoded);
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for param in &endpoint.params.query {
            if let Some(value) = self.param_values.get(&param.name) {
                if !value.is_empty() {
                    query.append_pair(&param.name, value);
                    has_query = true;
                }
            }
        }
        if has_query {
            url.push('?');
            url.push_str(&query.finish());
        }

        url
    }

    /// Derives the concrete request from the current state.
    #[must_use]
    pub fn resolved_request(&self) -> ResolvedRequest {
        let endpoint = self.endpoint();
        let body = (endpoint.method.has_body() && !self.body_text.is_empty())
            .then(|| self.body_text.clone());
        ResolvedRequest {
            method: endpoint.method,
            url: self.build_url(),
            headers: self.header_values.clone(),
            body,
        }
    }

    /// Marks the session in flight, clearing any previous outcome.
    pub fn begin_request(&mut self) {
        self.lifecycle = RequestLifecycle::InFlight;
    }

    /// Records a completed response.
    pub fn complete_request(&mut self, response: ResponseRecord) {
        self.lifecycle = RequestLifecycle::completed(response);
    }

    /// Records a failure.
    pub fn fail_request(&mut self, kind: RequestErrorKind, message: impl Into<String>) {
        self.lifecycle = RequestLifecycle::failed(kind, message);
    }

    /// Returns an in-flight session to Idle (the cancel path).
    pub fn reset_lifecycle(&mut self) {
        self.lifecycle = RequestLifecycle::Idle;
    }
}
