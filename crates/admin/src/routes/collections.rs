//! Collection actions: merge-save keyed by slug.
//!
//! There is no delete for collections - the slug is the document key,
//! and repeated saves to the same slug merge into the one document.

use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use harmattan_core::CollectionDraft;

use crate::middleware::RequireOperator;
use crate::services::catalog::CatalogService;
use crate::services::{NoticeKind, set_notice};
use crate::state::AppState;

use super::panel::{CollectionFormView, ProductFormView, render_panel};

/// Build the collection actions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/collections", post(save))
}

/// Collection form body.
#[derive(Debug, Clone, Deserialize)]
struct CollectionForm {
    slug: String,
    name: String,
    wallpaper: String,
    #[serde(default)]
    locked: bool,
    unlock_at: String,
}

impl CollectionForm {
    fn into_draft(self) -> CollectionDraft {
        CollectionDraft {
            slug: self.slug,
            name: self.name,
            wallpaper: self.wallpaper,
            locked: self.locked,
            unlock_at: self.unlock_at,
        }
    }
}

/// Merge-save the collection form.
///
/// POST /admin/collections
async fn save(
    RequireOperator(identity): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CollectionForm>,
) -> Response {
    let draft = form.into_draft();
    let now_ms = Utc::now().timestamp_millis();

    let catalog = CatalogService::new(state.store());
    match catalog.save_collection(&draft, now_ms).await {
        Ok(_slug) => {
            set_notice(&session, NoticeKind::Success, "Collection saved.").await;
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            set_notice(&session, NoticeKind::Error, e.to_string()).await;
            render_panel(
                &state,
                &session,
                identity.email.to_string(),
                ProductFormView::default(),
                CollectionFormView::from(&draft),
                None,
            )
            .await
            .into_response()
        }
    }
}
