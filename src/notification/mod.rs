// Declare submodules
pub mod action;
pub mod notification_dto;
pub mod notification_models;
pub mod notification_service;
pub mod notification_store;

// Re-export public items
pub use action::{ActionOperation, FollowUp, Navigate, NotificationAction};
pub use notification_dto::NotificationPayload;
pub use notification_models::{sample_notifications, Notification, NotificationId, NotificationKind};
pub use notification_service::NotificationCenter;
pub use notification_store::NotificationStore;
