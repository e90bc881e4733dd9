//! Services: catalog write-through, live mirrors, and the notice banner.

pub mod catalog;
pub mod mirror;
pub mod notice;

pub use catalog::{CatalogError, CatalogService, SavedProduct};
pub use notice::{Notice, NoticeKind, current_notice, set_notice};
