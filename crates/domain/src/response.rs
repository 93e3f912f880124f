//! Response record types
//!
//! What one executed request produced: status, headers, a body resolved
//! once into JSON or text, and wall-clock timing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP status code with the reason phrases the response pane displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a status code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for 2xx codes; drives the success badge.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Canonical reason phrase for common codes.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = self.reason_phrase();
        if phrase.is_empty() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{} {}", self.0, phrase)
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Response payload, resolved exactly once at read time.
///
/// The variant is decided by the response's `Content-Type`, not re-sniffed
/// by every consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Parsed JSON document (the Content-Type contained `application/json`).
    Json(serde_json::Value),
    /// Raw text payload.
    Text(String),
}

impl ResponseBody {
    /// Resolves a payload from the response's Content-Type.
    ///
    /// A JSON Content-Type whose payload fails to parse falls back to text:
    /// the record exists for display, not for re-validation.
    #[must_use]
    pub fn resolve(content_type: Option<&str>, raw: String) -> Self {
        if content_type.is_some_and(|ct| ct.contains("application/json")) {
            if let Ok(value) = serde_json::from_str(&raw) {
                return Self::Json(value);
            }
        }
        Self::Text(raw)
    }

    /// Returns the JSON document if this is a JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Renders the body for the response pane: JSON pretty-printed, text
    /// verbatim.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Json(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Everything the playground records about one completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Status text, e.g. "OK" or "Not Found".
    pub status_text: String,
    /// Response headers. Ordering carries no meaning.
    pub headers: HashMap<String, String>,
    /// Response payload.
    pub body: ResponseBody,
    /// Wall-clock time from dispatch to body completion, whole milliseconds.
    pub elapsed_ms: u64,
}

impl ResponseRecord {
    /// Builds a record from raw response data, resolving the body from the
    /// response's Content-Type header.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        raw_body: String,
        elapsed_ms: u64,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str());
        let body = ResponseBody::resolve(content_type, raw_body);
        Self {
            status,
            status_text: StatusCode::new(status).reason_phrase().to_string(),
            headers,
            body,
            elapsed_ms,
        }
    }

    /// Returns true for 2xx responses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        StatusCode::new(self.status).is_success()
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
