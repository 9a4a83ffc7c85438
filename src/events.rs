use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::notification::{Notification, NotificationId, NotificationKind};
use crate::toast::{DismissReason, Toast, ToastId};

/// Everything the notification center broadcasts to live subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    NotificationAdded(NotificationAddedPayload),
    NotificationRead { id: NotificationId },
    AllNotificationsRead { count: usize },
    NotificationRemoved { id: NotificationId },
    NotificationsCleared { count: usize },
    ToastShown(ToastShownPayload),
    ToastDismissed { id: ToastId, reason: DismissReason },
    ActionTriggered { id: NotificationId, label: String },
    NavigationRequested { route: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationAddedPayload {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub auto_close: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationAddedPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind,
            auto_close: notification.auto_close,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToastShownPayload {
    pub id: ToastId,
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
}

impl From<&Toast> for ToastShownPayload {
    fn from(toast: &Toast) -> Self {
        Self {
            id: toast.id,
            message: toast.message.clone(),
            kind: toast.kind,
            duration_ms: toast.duration_ms,
        }
    }
}
