use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::events::BusEvent;

use super::notification_dto::NotificationPayload;
use super::notification_models::NotificationKind;
use super::notification_service::NotificationCenter;

/// A follow-up operation a user can trigger from a notification.
///
/// Operations receive the center so they can raise further notifications.
/// They run with no store lock held.
pub trait ActionOperation: Send + Sync {
    fn run(&self, center: &NotificationCenter) -> anyhow::Result<()>;
}

/// Label plus the operation it triggers.
#[derive(Clone)]
pub struct NotificationAction {
    label: String,
    operation: Arc<dyn ActionOperation>,
}

impl NotificationAction {
    pub fn new(label: impl Into<String>, operation: impl ActionOperation + 'static) -> Self {
        Self {
            label: label.into(),
            operation: Arc::new(operation),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn operation(&self) -> Arc<dyn ActionOperation> {
        Arc::clone(&self.operation)
    }
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Serialize for NotificationAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NotificationAction", 1)?;
        state.serialize_field("label", &self.label)?;
        state.end()
    }
}

/// Raises one confirmation notification, e.g. "Refund Initiated" after
/// "Send Refund".
#[derive(Debug, Clone)]
pub struct FollowUp {
    title: String,
    message: String,
    kind: NotificationKind,
}

impl FollowUp {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

impl ActionOperation for FollowUp {
    fn run(&self, center: &NotificationCenter) -> anyhow::Result<()> {
        center.add_notification(NotificationPayload::new(
            self.title.clone(),
            self.message.clone(),
            self.kind,
        ))?;
        Ok(())
    }
}

/// Asks the surrounding UI to open another page.
#[derive(Debug, Clone)]
pub struct Navigate {
    route: String,
}

impl Navigate {
    pub fn new(route: impl Into<String>) -> Self {
        Self { route: route.into() }
    }
}

impl ActionOperation for Navigate {
    fn run(&self, center: &NotificationCenter) -> anyhow::Result<()> {
        center.publish(BusEvent::NavigationRequested {
            route: self.route.clone(),
        });
        Ok(())
    }
}
