//! Live update streams for the open panel.
//!
//! Each endpoint serves one long-lived SSE connection carrying the full
//! current result set: an `update` event immediately on connect, then
//! another after every change to the underlying collection. Failures
//! surface as `error` events with the failure message; the stream does
//! not retry beyond refetching on the next change. The mirror's store
//! subscription is owned by the connection, so closing the panel tears
//! it down - and the access gate runs before the stream starts, so a
//! signed-out visitor never holds one.

use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
    routing::get,
};
use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::middleware::RequireOperator;
use crate::services::mirror;
use crate::state::AppState;

/// Build the live updates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/events/products", get(products))
        .route("/admin/events/collections", get(collections))
        .route("/admin/events/timer", get(timer))
}

/// Live product list.
///
/// GET /admin/events/products
async fn products(
    RequireOperator(_): RequireOperator,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = mirror::products(state.store().clone()).map(|update| -> Result<Event, Infallible> {
        Ok(match update {
            Ok(list) => update_event(&list),
            Err(e) => error_event(format!("Could not load products: {e}")),
        })
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Live collection list.
///
/// GET /admin/events/collections
async fn collections(
    RequireOperator(_): RequireOperator,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = mirror::collections(state.store().clone()).map(|update| -> Result<Event, Infallible> {
        Ok(match update {
            Ok(list) => update_event(&list),
            Err(e) => error_event(format!("Could not load collections: {e}")),
        })
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Live homepage settings.
///
/// GET /admin/events/timer
async fn timer(
    RequireOperator(_): RequireOperator,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = mirror::timer(state.store().clone()).map(|update| -> Result<Event, Infallible> {
        Ok(match update {
            Ok(settings) => update_event(&settings),
            Err(e) => error_event(format!("Could not load timer: {e}")),
        })
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Build an `update` event carrying the full payload as JSON.
fn update_event<T: Serialize>(payload: &T) -> Event {
    Event::default()
        .event("update")
        .json_data(payload)
        .unwrap_or_else(|e| error_event(format!("Could not encode update: {e}")))
}

/// Build an `error` event carrying the failure message.
fn error_event(message: String) -> Event {
    Event::default().event("error").data(message)
}
