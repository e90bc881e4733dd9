//! Core types for Harmattan.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use slug::{Slug, SlugError};
pub use status::ProductStatus;
