//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::DocumentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    store: DocumentStore,
}

impl AppState {
    /// Build the shared state from configuration and the database pool.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let store = DocumentStore::new(pool.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The database pool (readiness checks, session store).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }
}
