//! Opaque document keys.
//!
//! Product documents are keyed by a store-assigned opaque string. The
//! newtype keeps those keys from being mixed up with slugs or other
//! stringly data.

use serde::{Deserialize, Serialize};

/// Store-assigned key of a product document.
///
/// Assigned by the document store on creation; never derived from
/// product data. An empty id only exists transiently while a document
/// is being mapped out of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing document key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_string() {
        let id = ProductId::new("a1b2c3");
        assert_eq!(id.as_str(), "a1b2c3");
        assert_eq!(String::from(id), "a1b2c3");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ProductId::new("doc-key");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"doc-key\"");
    }
}
