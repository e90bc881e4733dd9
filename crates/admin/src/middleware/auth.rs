//! The operator access gate.
//!
//! The session carries the authenticated identity (an email attribute,
//! nothing else). [`RequireOperator`] re-runs the gate on every request
//! to the admin surface: no identity redirects to the sign-in page, an
//! identity whose email is not exactly the configured operator address
//! redirects to the public storefront. Unauthorized visitors are
//! silently redirected, never shown an error - and because the check is
//! per-request, signing out elsewhere revokes access on the very next
//! request.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use harmattan_core::Email;

use crate::state::AppState;

/// Redirect target for visitors with no identity.
pub const SIGN_IN_PATH: &str = "/login";
/// Redirect target for authenticated visitors who are not the operator.
pub const STOREFRONT_PATH: &str = "/store";

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current signed-in identity.
    pub const CURRENT_IDENTITY: &str = "current_identity";
}

/// Session-stored identity.
///
/// Minimal data identifying whoever the identity provider signed in;
/// the gate decides separately whether that identity is the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentIdentity {
    /// The identity's email attribute.
    pub email: Email,
}

/// Extractor that requires the configured operator.
///
/// # Example
///
/// ```rust,ignore
/// async fn panel(RequireOperator(identity): RequireOperator) -> impl IntoResponse {
///     format!("Hello, {}", identity.email)
/// }
/// ```
pub struct RequireOperator(pub CurrentIdentity);

/// Rejection when the gate does not let a request through.
pub enum GateRejection {
    /// No identity in the session - go sign in.
    SignIn,
    /// Signed in, but not the operator - back to the storefront.
    NotOperator,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SignIn => Redirect::to(SIGN_IN_PATH).into_response(),
            Self::NotOperator => Redirect::to(STOREFRONT_PATH).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireOperator {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(GateRejection::SignIn)?;

        let identity: CurrentIdentity = session
            .get(session_keys::CURRENT_IDENTITY)
            .await
            .ok()
            .flatten()
            .ok_or(GateRejection::SignIn)?;

        if identity.email != state.config().operator().email {
            return Err(GateRejection::NotOperator);
        }

        Ok(Self(identity))
    }
}

/// Record the signed-in identity in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    identity: &CurrentIdentity,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_IDENTITY, identity)
        .await
}

/// Clear the signed-in identity from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentIdentity>(session_keys::CURRENT_IDENTITY)
        .await?;
    Ok(())
}
