//! Endpoint descriptor model
//!
//! Static schema for one HTTP operation as declared in the documentation
//! config: method, path template and the four parameter groups. Pure data;
//! validation happens when the enclosing config is loaded.

use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

/// Value type of a declared parameter, driving the form control the
/// presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Free-form text input.
    String,
    /// Numeric input.
    Number,
    /// Checkbox-style flag.
    Boolean,
}

/// A default value carried by a parameter declaration.
///
/// Kept loosely typed on purpose: the config may declare `"42"`, `42` or
/// `true`, and the session stores every value as the string a form field
/// would hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// String default.
    String(String),
    /// Numeric default.
    Number(serde_json::Number),
    /// Boolean default.
    Boolean(bool),
}

impl ParamValue {
    /// Renders the value the way a form input would hold it.
    #[must_use]
    pub fn to_field_value(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

/// Declaration of a single request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name, unique within its group.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub kind: ParamKind,
    /// Whether the form marks this parameter as required.
    #[serde(default)]
    pub required: bool,
    /// Value pre-filled when the endpoint is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    /// Human-readable description shown next to the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    /// Creates a parameter with no default and no description.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: None,
        }
    }

    /// Attaches a default value.
    #[must_use]
    pub fn with_default(mut self, default: ParamValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// The four independent, ordered parameter groups of one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterGroups {
    /// Parameters substituted into the path template.
    pub path: Vec<ParameterSpec>,
    /// Parameters appended to the query string, in declaration order.
    pub query: Vec<ParameterSpec>,
    /// Parameters rendered as header inputs.
    pub header: Vec<ParameterSpec>,
    /// Parameters documenting the body shape.
    pub body: Vec<ParameterSpec>,
}

/// One described HTTP operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders, joined onto the base URL.
    pub path: String,
    /// Optional human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared parameters, grouped by location.
    #[serde(default)]
    pub params: ParameterGroups,
}

impl EndpointDescriptor {
    /// Creates a descriptor with no declared parameters.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            description: None,
            params: ParameterGroups::default(),
        }
    }
}
