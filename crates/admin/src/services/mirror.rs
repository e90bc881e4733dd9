//! Live mirror streams.
//!
//! Each function returns a stream that keeps a list synchronized with
//! the store: it emits the full current result set immediately, then
//! again after every change to the underlying collection. There is no
//! incremental patching - every emission replaces the previous one
//! wholesale, which is what makes missed notifications harmless.
//!
//! The subscription handle is owned by the stream, so its lifetime is
//! exactly the lifetime of whatever consumes it (an SSE connection, in
//! practice): the subscription is acquired when the stream starts and
//! released when the consumer goes away. Errors are yielded, not
//! terminal - the stream stays subscribed and tries again on the next
//! change, relying on nothing smarter than the next refetch.

use futures::Stream;

use harmattan_core::{CollectionMeta, Product, SiteSettings};

use crate::db::documents::{COLLECTIONS, PRODUCTS, SETTINGS};
use crate::db::{DocumentStore, StoreError};
use crate::services::catalog::CatalogService;

/// Live product list, newest first.
pub fn products(store: DocumentStore) -> impl Stream<Item = Result<Vec<Product>, StoreError>> {
    async_stream::stream! {
        // Subscribe before the first fetch so no write can fall between
        // the snapshot and the subscription.
        let mut subscription = store.subscribe(PRODUCTS);
        loop {
            yield CatalogService::new(&store).list_products().await;
            if !subscription.changed().await {
                break;
            }
        }
    }
}

/// Live collection list, sorted by slug.
pub fn collections(
    store: DocumentStore,
) -> impl Stream<Item = Result<Vec<CollectionMeta>, StoreError>> {
    async_stream::stream! {
        let mut subscription = store.subscribe(COLLECTIONS);
        loop {
            yield CatalogService::new(&store).list_collections().await;
            if !subscription.changed().await {
                break;
            }
        }
    }
}

/// Live homepage settings document.
pub fn timer(store: DocumentStore) -> impl Stream<Item = Result<SiteSettings, StoreError>> {
    async_stream::stream! {
        let mut subscription = store.subscribe(SETTINGS);
        loop {
            yield CatalogService::new(&store).site_settings().await;
            if !subscription.changed().await {
                break;
            }
        }
    }
}
