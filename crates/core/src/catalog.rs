//! Catalog entities as stored in the document store.
//!
//! Documents are schemaless JSON with camelCase member names; the types
//! here are the shapes the admin panel reads and writes. Reads are
//! tolerant: fields added after early documents were written fall back
//! to defaults instead of failing the whole list.
//!
//! Each entity comes in two forms, a read type carrying the document key
//! (`Product`, `CollectionMeta`, `SiteSettings`) and a write payload
//! produced only by the validated drafts in [`crate::form`]. Payloads
//! never carry keys: product keys are store-assigned, collection keys
//! are the slug, the settings key is fixed.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ProductStatus, Slug};

/// Wallpaper used when a collection is saved without one.
pub const DEFAULT_WALLPAPER: &str = "/wallpapers/collection-1.jpg";

/// Homepage drop title used when the timer is saved without one.
pub const DEFAULT_DROP_TITLE: &str = "DROP INBOUND";

/// A product listing as read from the store.
///
/// `id` is the document key, filled in by the mapping layer; it is not
/// part of the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub collection_slug: String,
    pub description: String,
    pub status: ProductStatus,
    pub locked: bool,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    /// Millisecond epoch, client-assigned at creation. 0 when unknown.
    pub created_at: i64,
    /// Millisecond epoch, bumped on every write. 0 when unknown.
    pub updated_at: i64,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: ProductId::default(),
            name: String::new(),
            price: 0.0,
            category: String::new(),
            collection_slug: String::new(),
            description: String::new(),
            status: ProductStatus::default(),
            locked: false,
            sizes: Vec::new(),
            colors: Vec::new(),
            images: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// Validated write shape for a product.
///
/// Produced by [`crate::form::ProductDraft::normalize`]; `createdAt` is
/// added by the save path only when creating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub collection_slug: Slug,
    pub description: String,
    pub status: ProductStatus,
    pub locked: bool,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub updated_at: i64,
}

/// Collection metadata as read from the store.
///
/// The slug doubles as the document key, so it is both identity and
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    pub slug: Slug,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub wallpaper: String,
    #[serde(default)]
    pub locked: bool,
    /// Millisecond epoch of the unlock moment; 0 means no timer.
    #[serde(default)]
    pub unlock_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl CollectionMeta {
    /// Whether an unlock timer is set.
    #[must_use]
    pub const fn has_timer(&self) -> bool {
        self.unlock_at != 0
    }
}

/// Validated merge-write shape for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPayload {
    pub slug: Slug,
    pub name: String,
    pub wallpaper: String,
    pub locked: bool,
    pub unlock_at: i64,
    pub updated_at: i64,
}

/// Homepage settings document (`settings/site`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default = "default_drop_title")]
    pub drop_title: String,
    /// Millisecond epoch the homepage countdown runs to; 0 when unset.
    #[serde(default)]
    pub drop_end_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            drop_title: default_drop_title(),
            drop_end_at: 0,
            updated_at: 0,
        }
    }
}

/// Validated merge-write shape for the homepage timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPayload {
    pub drop_title: String,
    pub drop_end_at: i64,
    pub updated_at: i64,
}

fn default_drop_title() -> String {
    DEFAULT_DROP_TITLE.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_serializes_camel_case() {
        let payload = ProductPayload {
            name: "Harmattan Hoodie".to_owned(),
            price: 45000.0,
            category: "hoodies".to_owned(),
            collection_slug: Slug::parse("season-1").unwrap(),
            description: String::new(),
            status: ProductStatus::InStock,
            locked: false,
            sizes: vec!["S".to_owned(), "M".to_owned()],
            colors: vec!["Black".to_owned()],
            images: vec!["https://a.jpg".to_owned()],
            updated_at: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["collectionSlug"], "season-1");
        assert_eq!(value["updatedAt"], 1_700_000_000_000_i64);
        assert!(value.get("collection_slug").is_none());
    }

    #[test]
    fn product_read_tolerates_missing_fields() {
        // A minimal early document: no status, no arrays, no timestamps.
        let doc = json!({ "name": "Cap", "price": 12000, "category": "caps" });
        let product: Product = serde_json::from_value(doc).unwrap();

        assert_eq!(product.status, ProductStatus::InStock);
        assert!(product.images.is_empty());
        assert!(!product.locked);
        assert_eq!(product.created_at, 0);
    }

    #[test]
    fn collection_requires_slug() {
        let doc = json!({ "name": "Season 1" });
        assert!(serde_json::from_value::<CollectionMeta>(doc).is_err());
    }

    #[test]
    fn collection_timer_state() {
        let doc = json!({ "slug": "season-1" });
        let meta: CollectionMeta = serde_json::from_value(doc).unwrap();
        assert!(!meta.has_timer());
        assert_eq!(meta.unlock_at, 0);
    }

    #[test]
    fn site_settings_default_title() {
        let settings: SiteSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings.drop_title, DEFAULT_DROP_TITLE);
        assert_eq!(settings.drop_end_at, 0);
    }
}
