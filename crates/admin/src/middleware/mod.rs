//! Middleware: session layer and the operator access gate.

pub mod auth;
pub mod session;

pub use auth::{CurrentIdentity, RequireOperator, clear_identity, set_identity};
pub use session::create_session_layer;
