//! Homepage timer actions.
//!
//! The storefront homepage runs a countdown to the next drop; this
//! saves its title and end time into the single `settings/site`
//! document.

use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use harmattan_core::TimerDraft;

use crate::middleware::RequireOperator;
use crate::services::catalog::CatalogService;
use crate::services::{NoticeKind, set_notice};
use crate::state::AppState;

use super::panel::{CollectionFormView, ProductFormView, TimerFormView, render_panel};

/// Build the timer actions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/timer", post(save))
}

/// Timer form body.
#[derive(Debug, Clone, Deserialize)]
struct TimerForm {
    title: String,
    end_at: String,
}

impl TimerForm {
    fn into_draft(self) -> TimerDraft {
        TimerDraft {
            title: self.title,
            end_at: self.end_at,
        }
    }
}

/// Merge-save the homepage timer.
///
/// POST /admin/timer
async fn save(
    RequireOperator(identity): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TimerForm>,
) -> Response {
    let draft = form.into_draft();
    let now_ms = Utc::now().timestamp_millis();

    let catalog = CatalogService::new(state.store());
    match catalog.save_timer(&draft, now_ms).await {
        Ok(()) => {
            set_notice(&session, NoticeKind::Success, "Homepage timer saved.").await;
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            set_notice(&session, NoticeKind::Error, e.to_string()).await;
            render_panel(
                &state,
                &session,
                identity.email.to_string(),
                ProductFormView::default(),
                CollectionFormView::default(),
                Some(TimerFormView::from(&draft)),
            )
            .await
            .into_response()
        }
    }
}
