//! Code generation language set

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target languages of the snippet generator.
///
/// The set is closed: the language picker renders exactly these tabs and
/// the generator matches on them exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    /// cURL command line.
    #[default]
    Curl,
    /// JavaScript with the fetch API.
    JavaScript,
    /// Python with the requests library.
    Python,
    /// Go with net/http.
    Go,
    /// Rust with reqwest.
    Rust,
}

impl CodeLanguage {
    /// Label shown on the language tab.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Curl => "cURL",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Go => "Go",
            Self::Rust => "Rust",
        }
    }

    /// All selectable languages, in tab order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Curl,
            Self::JavaScript,
            Self::Python,
            Self::Go,
            Self::Rust,
        ]
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
