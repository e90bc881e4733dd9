//! Product availability status.

use serde::{Deserialize, Serialize};

/// Availability of a product on the storefront.
///
/// Serialized in the documents as `in-stock`, `sold-out`, `pre-order`.
/// Documents written before the status field existed deserialize as
/// [`ProductStatus::InStock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    #[default]
    InStock,
    SoldOut,
    PreOrder,
}

impl ProductStatus {
    /// The wire/form value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::SoldOut => "sold-out",
            Self::PreOrder => "pre-order",
        }
    }

    /// Label shown in the panel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::SoldOut => "Sold out",
            Self::PreOrder => "Pre-order",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-stock" => Ok(Self::InStock),
            "sold-out" => Ok(Self::SoldOut),
            "pre-order" => Ok(Self::PreOrder),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&ProductStatus::PreOrder).expect("serialize");
        assert_eq!(json, "\"pre-order\"");
    }

    #[test]
    fn parses_wire_values() {
        assert_eq!("sold-out".parse::<ProductStatus>(), Ok(ProductStatus::SoldOut));
        assert!("archived".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn defaults_to_in_stock() {
        assert_eq!(ProductStatus::default(), ProductStatus::InStock);
    }
}
