//! Collection slugs.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty (or whitespace only).
    #[error("slug cannot be empty")]
    Empty,
}

/// A collection slug: lowercase short identifier, e.g. `season-1`.
///
/// The slug doubles as the collection document's key in the store, which
/// makes it immutable once a document exists - writing a different slug
/// writes a different document. Parsing trims and lowercases; no further
/// character restrictions are imposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse a `Slug` from user input, trimming and lowercasing.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if nothing remains after trimming.
    pub fn parse(input: &str) -> Result<Self, SlugError> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(SlugError::Empty);
        }
        Ok(Self(normalized))
    }

    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the slug and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        let slug = Slug::parse("  Season-1 ").expect("valid slug");
        assert_eq!(slug.as_str(), "season-1");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("   "), Err(SlugError::Empty));
    }

    #[test]
    fn orders_lexically() {
        let mut slugs = vec![
            Slug::parse("season-2").expect("valid"),
            Slug::parse("archive").expect("valid"),
            Slug::parse("season-1").expect("valid"),
        ];
        slugs.sort();
        let ordered: Vec<&str> = slugs.iter().map(Slug::as_str).collect();
        assert_eq!(ordered, ["archive", "season-1", "season-2"]);
    }
}
