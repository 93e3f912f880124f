//! Ordered header collection

use serde::{Deserialize, Serialize};

/// A single HTTP header, sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as entered.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An insertion-ordered header collection.
///
/// `set` upserts: overwriting a value keeps the header at its original
/// position, so generated snippets stay stable while the user edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts or replaces a header. Name matching is exact.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.items.iter_mut().find(|h| h.name == name) {
            existing.value = value;
        } else {
            self.items.push(Header::new(name, value));
        }
    }

    /// Value of the named header, if present. Name matching is exact.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Case-insensitive presence check, as required for deciding whether a
    /// `Content-Type` has been set explicitly.
    #[must_use]
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.items.iter().any(|h| h.name.eq_ignore_ascii_case(name))
    }

    /// Headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}
