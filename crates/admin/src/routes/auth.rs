//! Sign-in and sign-out.
//!
//! Identity verification proper is out of scope for the panel: the form
//! takes an email and the configured access key, and a matching key
//! signs that email in. Whether the signed-in identity may enter the
//! panel is the access gate's decision, made separately on every admin
//! request - a valid key with a non-operator email lands on the
//! storefront, not in the panel.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use harmattan_core::Email;

use crate::middleware::{CurrentIdentity, clear_identity, set_identity};
use crate::services::{NoticeKind, current_notice, set_notice};
use crate::state::AppState;

use super::panel::NoticeView;

/// Sign-in page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    notice: Option<NoticeView>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Sign-in form body.
#[derive(Debug, Deserialize)]
struct LoginForm {
    email: String,
    access_key: String,
}

/// Render the sign-in page.
///
/// GET /login
async fn login_page(session: Session) -> impl IntoResponse {
    let template = LoginPageTemplate {
        notice: current_notice(&session).await.map(NoticeView::from),
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {e}");
        "Internal Server Error".to_owned()
    }))
}

/// Sign in with email and access key.
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let Ok(email) = Email::parse(form.email.trim()) else {
        set_notice(&session, NoticeKind::Error, "Enter a valid email address.").await;
        return Redirect::to("/login");
    };

    let configured = state.config().operator().access_key.expose_secret();
    if form.access_key.trim() != configured {
        tracing::warn!(email = %email, "sign-in rejected: wrong access key");
        set_notice(&session, NoticeKind::Error, "Invalid access key.").await;
        return Redirect::to("/login");
    }

    if let Err(e) = set_identity(&session, &CurrentIdentity { email }).await {
        tracing::error!(error = %e, "failed to store identity in session");
        set_notice(&session, NoticeKind::Error, "Could not sign you in.").await;
        return Redirect::to("/login");
    }

    Redirect::to("/admin")
}

/// Sign out and clear the session identity.
///
/// POST /logout
async fn logout(session: Session) -> Redirect {
    let _ = clear_identity(&session).await;
    Redirect::to("/login")
}
