//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check (in main)
//! GET  /health/ready                - Readiness check (in main)
//!
//! # Auth
//! GET  /login                       - Sign-in page
//! POST /login                       - Sign in with email + access key
//! POST /logout                      - Sign out
//!
//! # Panel (operator only)
//! GET  /admin                       - The panel (?edit=<id> loads a product,
//!                                     ?load=<slug> loads a collection)
//!
//! # Products
//! POST /admin/products              - Create, or update when editing
//! POST /admin/products/cancel       - Cancel the edit in progress
//! POST /admin/products/{id}/delete  - Delete (immediate, unconfirmed)
//! POST /admin/products/{id}/lock    - Toggle the locked flag
//!
//! # Collections
//! POST /admin/collections           - Merge-save keyed by slug
//!
//! # Homepage timer
//! POST /admin/timer                 - Merge-save settings/site
//!
//! # Live updates (SSE)
//! GET  /admin/events/products       - Full product list on every change
//! GET  /admin/events/collections    - Full collection list on every change
//! GET  /admin/events/timer          - Settings document on every change
//! ```

pub mod auth;
pub mod collections;
pub mod events;
pub mod panel;
pub mod products;
pub mod timer;

use axum::Router;

use crate::state::AppState;

/// Build the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(panel::router())
        .merge(products::router())
        .merge(collections::router())
        .merge(timer::router())
        .merge(events::router())
}
