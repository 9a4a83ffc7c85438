use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::notification::NotificationKind;

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// Toast identifiers come from their own counter and never coincide with
/// the notification a toast mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(u64);

impl ToastId {
    pub fn next() -> Self {
        Self(NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tst-{}", self.0)
    }
}

/// Display copy of a notification; it holds no link back to its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
    pub shown_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    Expired,
    Dismissed,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DismissReason::Expired => write!(f, "expired"),
            DismissReason::Dismissed => write!(f, "dismissed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_id_display() {
        let id = ToastId(7);
        assert_eq!(id.to_string(), "tst-7");
        assert!(ToastId::next() < ToastId::next());
    }

    #[test]
    fn test_dismiss_reason_display() {
        assert_eq!(DismissReason::Expired.to_string(), "expired");
        assert_eq!(DismissReason::Dismissed.to_string(), "dismissed");
    }
}
