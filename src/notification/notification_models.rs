use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AppError;

use super::action::NotificationAction;
use super::notification_dto::NotificationPayload;

static NEXT_NOTIFICATION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique notification identifier. Later notifications always
/// compare greater than earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn next() -> Self {
        Self(NEXT_NOTIFICATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ntf-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationKind::Info),
            "success" => Ok(NotificationKind::Success),
            "warning" => Ok(NotificationKind::Warning),
            "error" => Ok(NotificationKind::Error),
            other => Err(AppError::UnknownKind(other.to_string())),
        }
    }
}

/// A persistent notification record as held by the store.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub auto_close: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl Notification {
    pub(crate) fn from_payload(payload: NotificationPayload) -> Self {
        Self {
            id: NotificationId::next(),
            title: payload.title,
            message: payload.message,
            kind: payload.kind,
            read: false,
            created_at: Utc::now(),
            auto_close: payload.auto_close.unwrap_or(true),
            duration_ms: payload.duration_ms,
            action: payload.action,
        }
    }

    /// Build a record that predates the running process, used to preload
    /// the dropdown with history. Historical records never produce toasts.
    pub fn historical(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::next(),
            title: title.into(),
            message: message.into(),
            kind,
            read,
            created_at,
            auto_close: false,
            duration_ms: None,
            action: None,
        }
    }

    pub fn action_label(&self) -> Option<&str> {
        self.action.as_ref().map(|action| action.label())
    }
}

/// The sample records the console starts with.
pub fn sample_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    use chrono::Duration;

    vec![
        Notification::historical(
            "New Order Received",
            "Order #ORD-123 has been placed by Fashion Store A",
            NotificationKind::Info,
            false,
            now - Duration::minutes(30),
        ),
        Notification::historical(
            "Low Stock Alert",
            "Blue Denim Jeans is running low on stock (5 items remaining)",
            NotificationKind::Warning,
            false,
            now - Duration::hours(2),
        ),
        Notification::historical(
            "Payment Received",
            "Payment of $2,450 received for Order #ORD-001",
            NotificationKind::Success,
            true,
            now - Duration::days(1),
        ),
        Notification::historical(
            "System Update",
            "New features have been added to the dashboard",
            NotificationKind::Info,
            false,
            now - Duration::hours(6),
        ),
    ]
}
