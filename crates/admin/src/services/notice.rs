//! The notice banner: a single-slot, auto-expiring status line.
//!
//! One notice is visible at a time. Setting a new one replaces the
//! previous notice immediately - message and kind - and restarts the
//! countdown. The slot lives in the operator's session; reads past the
//! expiry clear it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// How long a notice stays visible.
pub const NOTICE_TTL_MS: i64 = 4_500;

/// Session key holding the notice slot.
const NOTICE_KEY: &str = "notice";

/// Visual kind of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Success,
    Info,
}

impl NoticeKind {
    /// CSS class suffix used by the templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

/// A transient status message with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: i64,
}

impl Notice {
    /// Create a notice expiring [`NOTICE_TTL_MS`] after `now_ms`.
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>, now_ms: i64) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now_ms + NOTICE_TTL_MS,
        }
    }

    /// Whether the notice is still visible at `now_ms`.
    #[must_use]
    pub const fn is_live(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}

/// Replace the session's notice slot.
///
/// Session failures are swallowed: a notice that cannot be stored is a
/// cosmetic loss, not a reason to fail the operation it reports on.
pub async fn set_notice(session: &Session, kind: NoticeKind, message: impl Into<String>) {
    let notice = Notice::new(kind, message, Utc::now().timestamp_millis());
    if let Err(e) = session.insert(NOTICE_KEY, &notice).await {
        tracing::warn!(error = %e, "failed to store notice");
    }
}

/// The currently visible notice, if any. Expired notices are cleared.
pub async fn current_notice(session: &Session) -> Option<Notice> {
    let notice: Notice = session.get(NOTICE_KEY).await.ok().flatten()?;

    if notice.is_live(Utc::now().timestamp_millis()) {
        Some(notice)
    } else {
        let _ = session.remove::<Notice>(NOTICE_KEY).await;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let notice = Notice::new(NoticeKind::Success, "Product added.", 1_000);
        assert!(notice.is_live(1_000));
        assert!(notice.is_live(1_000 + NOTICE_TTL_MS - 1));
        assert!(!notice.is_live(1_000 + NOTICE_TTL_MS));
    }

    #[test]
    fn a_new_notice_replaces_kind_and_message() {
        // The slot is single-valued: whatever is written last wins,
        // including its kind and a fresh expiry.
        let first = Notice::new(NoticeKind::Error, "Price must be a valid number.", 0);
        let second = Notice::new(NoticeKind::Success, "Product added.", 3_000);

        assert!(!first.is_live(3_000 + NOTICE_TTL_MS - 1));
        assert!(second.is_live(3_000 + NOTICE_TTL_MS - 1));
        assert_eq!(second.kind, NoticeKind::Success);
    }

    #[test]
    fn kind_maps_to_css_suffix() {
        assert_eq!(NoticeKind::Error.as_str(), "error");
        assert_eq!(NoticeKind::Success.as_str(), "success");
        assert_eq!(NoticeKind::Info.as_str(), "info");
    }
}
