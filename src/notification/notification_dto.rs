use validator::Validate;

use super::action::NotificationAction;
use super::notification_models::NotificationKind;

/// Everything a producer supplies when raising a notification. The id,
/// timestamp and read flag are assigned by the center.
#[derive(Debug, Clone, Validate)]
pub struct NotificationPayload {
    pub title: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    pub kind: NotificationKind,
    /// `None` behaves like `Some(true)`: the notification is mirrored as a toast.
    pub auto_close: Option<bool>,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration_ms: Option<u64>,
    pub action: Option<NotificationAction>,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            auto_close: None,
            duration_ms: None,
            action: None,
        }
    }

    /// Keep the notification in the dropdown only, without a toast.
    pub fn persistent(mut self) -> Self {
        self.auto_close = Some(false);
        self
    }

    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}
