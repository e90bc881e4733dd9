//! Database layer: connection pool and the document store.
//!
//! # Database
//!
//! A single `PostgreSQL` database, schema `admin`:
//!
//! - `admin.documents` - the schemaless document store (see [`documents`])
//! - `admin.session` - session storage for tower-sessions
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p harmattan-cli -- migrate
//! ```

pub mod documents;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use documents::{DocumentStore, Subscription};

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested document was not found.
    #[error("document not found")]
    NotFound,

    /// A document could not be serialized for writing.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
