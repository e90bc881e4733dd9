//! Typed catalog operations over the document store.
//!
//! This is the write-through layer: drafts are normalized (or rejected
//! with their field error), payloads are written with the right
//! primitive for the entity - create or partial update for products,
//! merge-write for collections and settings - and lists are mapped back
//! into typed records. Malformed documents are skipped with a warning
//! rather than failing the whole list.

use serde_json::Value as JsonValue;

use harmattan_core::{
    CollectionDraft, CollectionMeta, FormError, Product, ProductDraft, ProductId, SiteSettings,
    Slug, TimerDraft,
};

use crate::db::documents::{COLLECTIONS, PRODUCTS, SETTINGS, SITE_KEY};
use crate::db::{DocumentStore, StoreError};

/// Errors from a catalog operation.
///
/// The display string is what the notice banner shows, so form errors
/// surface their exact field message and store errors their failure
/// message.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Outcome of a product save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedProduct {
    /// A new document was created with this key.
    Created(ProductId),
    /// The document being edited was updated in place.
    Updated,
}

/// Catalog operations bound to a store handle.
pub struct CatalogService<'a> {
    store: &'a DocumentStore,
}

impl<'a> CatalogService<'a> {
    /// Create a catalog service over the store.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All products, newest first (by their client-assigned `createdAt`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self.store.list_by_created_desc(PRODUCTS).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, doc)| match serde_json::from_value::<Product>(doc) {
                Ok(mut product) => {
                    product.id = ProductId::new(key);
                    Some(product)
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping malformed product document");
                    None
                }
            })
            .collect())
    }

    /// All collections, resorted by slug ascending for stable display.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    pub async fn list_collections(&self) -> Result<Vec<CollectionMeta>, StoreError> {
        let rows = self.store.list(COLLECTIONS).await?;

        let mut collections: Vec<CollectionMeta> = rows
            .into_iter()
            .filter_map(
                |(key, doc)| match serde_json::from_value::<CollectionMeta>(doc) {
                    Ok(meta) => Some(meta),
                    Err(e) => {
                        tracing::warn!(key, error = %e, "skipping malformed collection document");
                        None
                    }
                },
            )
            .collect();

        collections.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(collections)
    }

    /// The homepage settings document; defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    pub async fn site_settings(&self) -> Result<SiteSettings, StoreError> {
        let doc = self.store.get(SETTINGS, SITE_KEY).await?;

        Ok(doc
            .and_then(|doc| match serde_json::from_value(doc) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!(error = %e, "malformed settings document, using defaults");
                    None
                }
            })
            .unwrap_or_default())
    }

    /// Fetch one product by key, for loading into the form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    pub async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let Some(doc) = self.store.get(PRODUCTS, id.as_str()).await? else {
            return Ok(None);
        };

        let mut product: Product = serde_json::from_value(doc).map_err(StoreError::Encoding)?;
        product.id = id.clone();
        Ok(Some(product))
    }

    /// Fetch one collection by slug, for loading into the form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    pub async fn find_collection(&self, slug: &Slug) -> Result<Option<CollectionMeta>, StoreError> {
        let Some(doc) = self.store.get(COLLECTIONS, slug.as_str()).await? else {
            return Ok(None);
        };

        Ok(Some(
            serde_json::from_value(doc).map_err(StoreError::Encoding)?,
        ))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validate and save a product draft.
    ///
    /// With `editing` set, the payload partially updates that document
    /// and the edit is finished; otherwise a new document is created
    /// with `createdAt = now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Form`] with the first failing field, or
    /// [`CatalogError::Store`] if the write fails.
    pub async fn save_product(
        &self,
        draft: &ProductDraft,
        editing: Option<&ProductId>,
        now_ms: i64,
    ) -> Result<SavedProduct, CatalogError> {
        let payload = draft.normalize(now_ms)?;
        let mut doc = serde_json::to_value(&payload).map_err(StoreError::Encoding)?;

        match editing {
            Some(id) => {
                self.store.update(PRODUCTS, id.as_str(), &doc).await?;
                Ok(SavedProduct::Updated)
            }
            None => {
                if let JsonValue::Object(map) = &mut doc {
                    map.insert("createdAt".to_owned(), JsonValue::from(now_ms));
                }
                let key = self.store.insert(PRODUCTS, &doc).await?;
                Ok(SavedProduct::Created(ProductId::new(key)))
            }
        }
    }

    /// Delete a product document. Immediate and irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        self.store.delete(PRODUCTS, id.as_str()).await
    }

    /// Flip a product's `locked` flag, bumping `updatedAt` and touching
    /// nothing else. Returns the new locked state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the product is gone, or
    /// [`StoreError`] if the write fails.
    pub async fn toggle_product_lock(
        &self,
        id: &ProductId,
        now_ms: i64,
    ) -> Result<bool, StoreError> {
        let doc = self
            .store
            .get(PRODUCTS, id.as_str())
            .await?
            .ok_or(StoreError::NotFound)?;

        let locked = doc
            .get("locked")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);

        let patch = serde_json::json!({ "locked": !locked, "updatedAt": now_ms });
        self.store.update(PRODUCTS, id.as_str(), &patch).await?;

        Ok(!locked)
    }

    /// Validate and merge-save a collection draft.
    ///
    /// Keyed by the normalized slug: repeated saves overwrite fields but
    /// never create duplicate documents, and absent fields are never
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Form`] if the slug is missing, or
    /// [`CatalogError::Store`] if the write fails.
    pub async fn save_collection(
        &self,
        draft: &CollectionDraft,
        now_ms: i64,
    ) -> Result<Slug, CatalogError> {
        let payload = draft.normalize(now_ms)?;
        let doc = serde_json::to_value(&payload).map_err(StoreError::Encoding)?;

        self.store
            .merge(COLLECTIONS, payload.slug.as_str(), &doc)
            .await?;

        Ok(payload.slug)
    }

    /// Validate and merge-save the homepage timer.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Form`] if the end time is missing or
    /// unparseable, or [`CatalogError::Store`] if the write fails.
    pub async fn save_timer(&self, draft: &TimerDraft, now_ms: i64) -> Result<(), CatalogError> {
        let payload = draft.normalize(now_ms)?;
        let doc = serde_json::to_value(&payload).map_err(StoreError::Encoding)?;

        self.store.merge(SETTINGS, SITE_KEY, &doc).await?;
        Ok(())
    }
}
