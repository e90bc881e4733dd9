//! The document store: schemaless JSONB documents with live change
//! notification.
//!
//! Documents live in `admin.documents`, keyed by (collection, key).
//! Writes go through [`DocumentStore`]'s primitives - insert with a
//! store-assigned key, partial update, merge-write, delete - and every
//! successful write publishes the collection name on a broadcast
//! channel. [`DocumentStore::subscribe`] hands out a [`Subscription`]
//! filtered to one collection; readers refetch the full list whenever it
//! fires, so missed notifications coalesce harmlessly.

use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::StoreError;

/// Collection holding product documents (store-assigned keys).
pub const PRODUCTS: &str = "products";
/// Collection holding collection metadata (keyed by slug).
pub const COLLECTIONS: &str = "collections";
/// Collection holding site-wide settings documents.
pub const SETTINGS: &str = "settings";
/// Key of the single homepage settings document.
pub const SITE_KEY: &str = "site";

/// Capacity of the change broadcast channel. One operator produces
/// writes, so lagging a subscriber takes a pathological burst; lagged
/// subscribers refetch and lose nothing.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Handle to the document store.
///
/// Cheap to clone; all clones share the pool and the change channel.
#[derive(Clone)]
pub struct DocumentStore {
    pool: PgPool,
    changes: broadcast::Sender<String>,
}

impl DocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    /// Insert a new document, assigning and returning its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails.
    pub async fn insert(&self, collection: &str, doc: &JsonValue) -> Result<String, StoreError> {
        let key = Uuid::new_v4().simple().to_string();

        sqlx::query("INSERT INTO admin.documents (collection, key, doc) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&key)
            .bind(doc)
            .execute(&self.pool)
            .await?;

        self.notify(collection);
        Ok(key)
    }

    /// Partially update an existing document: fields present in `patch`
    /// overwrite, everything else is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such document exists, or
    /// [`StoreError::Database`] if the update fails.
    pub async fn update(
        &self,
        collection: &str,
        key: &str,
        patch: &JsonValue,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE admin.documents SET doc = doc || $3, updated_at = now() \
             WHERE collection = $1 AND key = $2",
        )
        .bind(collection)
        .bind(key)
        .bind(patch)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.notify(collection);
        Ok(())
    }

    /// Merge-write a document: update only the supplied fields, creating
    /// the document if absent. Fields not present in `doc` are never
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the upsert fails.
    pub async fn merge(
        &self,
        collection: &str,
        key: &str,
        doc: &JsonValue,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO admin.documents (collection, key, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, key) \
             DO UPDATE SET doc = documents.doc || EXCLUDED.doc, updated_at = now()",
        )
        .bind(collection)
        .bind(key)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        self.notify(collection);
        Ok(())
    }

    /// Delete a document. Deleting an absent document is a no-op, like
    /// the remote stores this models.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the delete fails.
    pub async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM admin.documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.notify(collection);
        }
        Ok(())
    }

    /// Fetch a single document by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<JsonValue>, StoreError> {
        let doc = sqlx::query_scalar::<_, JsonValue>(
            "SELECT doc FROM admin.documents WHERE collection = $1 AND key = $2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    /// List all documents of a collection as (key, doc) pairs, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn list(&self, collection: &str) -> Result<Vec<(String, JsonValue)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, JsonValue)>(
            "SELECT key, doc FROM admin.documents WHERE collection = $1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List all documents of a collection ordered by their embedded
    /// `createdAt` timestamp, newest first. Documents without one sort
    /// last.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn list_by_created_desc(
        &self,
        collection: &str,
    ) -> Result<Vec<(String, JsonValue)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, JsonValue)>(
            "SELECT key, doc FROM admin.documents WHERE collection = $1 \
             ORDER BY (doc->>'createdAt')::bigint DESC NULLS LAST",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Subscribe to change notifications for one collection.
    ///
    /// The returned handle fires after every successful write to that
    /// collection; dropping it tears the subscription down.
    #[must_use]
    pub fn subscribe(&self, collection: &str) -> Subscription {
        Subscription {
            collection: collection.to_owned(),
            rx: self.changes.subscribe(),
        }
    }

    fn notify(&self, collection: &str) {
        // Nobody listening is fine - the panel may simply not be open.
        let _ = self.changes.send(collection.to_owned());
    }
}

/// A live subscription to one collection's change notifications.
pub struct Subscription {
    collection: String,
    rx: broadcast::Receiver<String>,
}

impl Subscription {
    /// Wait until any document in the subscribed collection changes.
    ///
    /// Returns `false` once the store side of the channel is gone and no
    /// further changes can arrive. A lagged receiver reports a change
    /// instead of an error: readers fetch the full current list, so a
    /// missed notification carries no information of its own.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.rx.recv().await {
                Ok(changed) if changed == self.collection => return true,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => return true,
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn subscription_for(collection: &str) -> (broadcast::Sender<String>, Subscription) {
        let (tx, rx) = broadcast::channel(4);
        (
            tx,
            Subscription {
                collection: collection.to_owned(),
                rx,
            },
        )
    }

    #[tokio::test]
    async fn fires_on_matching_collection() {
        let (tx, mut sub) = subscription_for(PRODUCTS);
        tx.send(PRODUCTS.to_owned()).unwrap();
        assert!(sub.changed().await);
    }

    #[tokio::test]
    async fn skips_other_collections() {
        let (tx, mut sub) = subscription_for(PRODUCTS);
        tx.send(COLLECTIONS.to_owned()).unwrap();
        tx.send(PRODUCTS.to_owned()).unwrap();
        // The collections notification must be skipped, not surfaced.
        assert!(sub.changed().await);
        drop(tx);
        assert!(!sub.changed().await);
    }

    #[tokio::test]
    async fn ends_when_store_is_dropped() {
        let (tx, mut sub) = subscription_for(PRODUCTS);
        drop(tx);
        assert!(!sub.changed().await);
    }

    #[tokio::test]
    async fn lag_reports_a_change() {
        let (tx, mut sub) = subscription_for(PRODUCTS);
        // Overflow the 4-slot channel so the receiver lags.
        for _ in 0..8 {
            tx.send(COLLECTIONS.to_owned()).unwrap();
        }
        assert!(sub.changed().await);
    }
}
