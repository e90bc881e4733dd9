//! Harmattan Core - Shared types library.
//!
//! This crate provides common types used across the Harmattan components:
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and the logo filter
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, slugs, emails, and statuses
//! - [`catalog`] - Catalog entities as stored in the document store
//! - [`form`] - Form drafts and their normalize-and-validate step

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod form;
pub mod types;

pub use catalog::*;
pub use form::*;
pub use types::*;
