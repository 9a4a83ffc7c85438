use dashmap::DashMap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::events::{BusEvent, NotificationAddedPayload};
use crate::state::Config;
use crate::sync::lock;
use crate::toast::{Toast, ToastId, ToastScheduler};

use super::notification_dto::NotificationPayload;
use super::notification_models::{Notification, NotificationId, NotificationKind};
use super::notification_store::NotificationStore;

struct CenterInner {
    store: Mutex<NotificationStore>,
    toasts: ToastScheduler,
    events: broadcast::Sender<BusEvent>,
    shutdown: CancellationToken,
    generators: DashMap<u64, CancellationToken>,
    next_generator: AtomicU64,
}

/// Shared handle to the notification store, the toast scheduler and the
/// event bus. Clone it into every consumer.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    pub fn new(config: &Config) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let toasts = ToastScheduler::new(events.clone(), config.default_toast_duration());

        info!("Notification center created");
        Self {
            inner: Arc::new(CenterInner {
                store: Mutex::new(NotificationStore::new()),
                toasts,
                events,
                shutdown: CancellationToken::new(),
                generators: DashMap::new(),
                next_generator: AtomicU64::new(1),
            }),
        }
    }

    /// Record a new notification at the head of the store and, unless the
    /// payload opts out, mirror it as a toast.
    ///
    /// The add is all or nothing: if the toast cannot be shown (no runtime,
    /// or a concurrent shutdown) the record is taken back out of the store
    /// and nothing is published.
    pub fn add_notification(&self, payload: NotificationPayload) -> Result<NotificationId> {
        payload.validate()?;
        if self.is_shut_down() {
            warn!("Dropping notification '{}' after shutdown", payload.title);
            return Err(AppError::ShutDown);
        }

        let duration = payload.duration_ms.map(Duration::from_millis);
        let notification = Notification::from_payload(payload);
        let id = notification.id;
        let auto_close = notification.auto_close;
        let toast_message = notification.message.clone();
        let kind = notification.kind;
        let added = NotificationAddedPayload::from(&notification);

        lock(&self.inner.store).prepend(notification);

        if auto_close {
            if let Err(e) = self.inner.toasts.show(toast_message, kind, duration) {
                lock(&self.inner.store).remove(id);
                warn!("Notification '{}' rolled back, toast not shown: {}", added.title, e);
                return Err(e);
            }
        }

        debug!("Notification {} added: {}", id, added.title);
        self.publish(BusEvent::NotificationAdded(added));
        Ok(id)
    }

    /// Like [`add_notification`](Self::add_notification) for follow-on
    /// notifications whose loss should not fail the operation that raised
    /// them. Failures are logged.
    pub fn try_add_notification(&self, payload: NotificationPayload) -> Option<NotificationId> {
        let title = payload.title.clone();
        match self.add_notification(payload) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Follow-on notification '{}' dropped: {}", title, e);
                None
            }
        }
    }

    /// Whether a toast-raising notification would be accepted right now.
    /// Callers check this before mutating their own state.
    pub fn ensure_accepting(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(AppError::ShutDown);
        }
        tokio::runtime::Handle::try_current().map_err(|_| AppError::NoRuntime)?;
        Ok(())
    }

    pub fn mark_as_read(&self, id: NotificationId) {
        if self.is_shut_down() {
            return;
        }
        let changed = lock(&self.inner.store).mark_as_read(id);
        if changed {
            debug!("Notification {} marked as read", id);
            self.publish(BusEvent::NotificationRead { id });
        }
    }

    pub fn mark_all_as_read(&self) {
        if self.is_shut_down() {
            return;
        }
        let count = lock(&self.inner.store).mark_all_as_read();
        debug!("Marked {} notifications as read", count);
        self.publish(BusEvent::AllNotificationsRead { count });
    }

    pub fn remove_notification(&self, id: NotificationId) {
        if self.is_shut_down() {
            return;
        }
        let removed = lock(&self.inner.store).remove(id);
        if removed.is_some() {
            debug!("Notification {} removed", id);
            self.publish(BusEvent::NotificationRemoved { id });
        }
    }

    pub fn clear_all_notifications(&self) {
        if self.is_shut_down() {
            return;
        }
        let count = lock(&self.inner.store).clear();
        debug!("Cleared {} notifications", count);
        self.publish(BusEvent::NotificationsCleared { count });
    }

    /// Preload records that predate this process. They go behind anything
    /// already stored and never raise toasts.
    pub fn seed(&self, history: Vec<Notification>) {
        let count = history.len();
        lock(&self.inner.store).append_history(history);
        debug!("Seeded {} historical notifications", count);
    }

    /// Newest-first snapshot of the store.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.inner.store).snapshot()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        lock(&self.inner.store).get(id).cloned()
    }

    pub fn unread_count(&self) -> usize {
        lock(&self.inner.store).unread_count()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.store).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.store).is_empty()
    }

    /// Show a toast that has no persistent notification behind it.
    pub fn show_toast(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration_ms: Option<u64>,
    ) -> Result<ToastId> {
        if duration_ms == Some(0) {
            return Err(AppError::Validation("duration must be positive".to_string()));
        }
        self.inner
            .toasts
            .show(message, kind, duration_ms.map(Duration::from_millis))
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.toasts.toasts()
    }

    pub fn dismiss_toast(&self, id: ToastId) {
        self.inner.toasts.remove(id);
    }

    /// Run the action attached to a notification.
    ///
    /// Returns `false` when the notification is gone or has no action. A
    /// failing or panicking operation is reported as a new error
    /// notification instead of reaching the caller.
    pub fn trigger_action(&self, id: NotificationId) -> bool {
        if self.is_shut_down() {
            return false;
        }
        let action = lock(&self.inner.store)
            .get(id)
            .and_then(|notification| notification.action.clone());
        let Some(action) = action else {
            return false;
        };

        let label = action.label().to_string();
        debug!("Triggering action '{}' on notification {}", label, id);
        self.publish(BusEvent::ActionTriggered {
            id,
            label: label.clone(),
        });

        let operation = action.operation();
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| operation.run(self))) {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{:#}", e)),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };

        if let Some(reason) = failure {
            error!("Action '{}' on notification {} failed: {}", label, id, reason);
            let report = NotificationPayload::new(
                "Action Failed",
                format!("{}: {}", label, reason),
                NotificationKind::Error,
            );
            if let Err(e) = self.add_notification(report) {
                warn!("Could not report failed action '{}': {}", label, e);
            }
        }
        true
    }

    /// Live feed of every mutation.
    pub fn subscribe(&self) -> BroadcastStream<BusEvent> {
        BroadcastStream::new(self.inner.events.subscribe())
    }

    /// Tear down: abort all toast timers and stop every ambient generator
    /// started from this center. Later mutations are ignored.
    pub fn shutdown(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        self.inner.shutdown.cancel();
        self.inner.toasts.shutdown();
        info!(
            "Notification center shut down ({} generators signalled)",
            self.inner.generators.len()
        );
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    pub fn active_generators(&self) -> usize {
        self.inner.generators.len()
    }

    pub(crate) fn publish(&self, event: BusEvent) {
        // No subscribers is a normal state.
        let _ = self.inner.events.send(event);
    }

    pub(crate) fn register_generator(&self) -> (u64, CancellationToken) {
        let id = self.inner.next_generator.fetch_add(1, Ordering::Relaxed);
        let token = self.inner.shutdown.child_token();
        self.inner.generators.insert(id, token.clone());
        (id, token)
    }

    pub(crate) fn unregister_generator(&self, id: u64) {
        if self.inner.generators.remove(&id).is_some() {
            debug!("Ambient generator {} unregistered", id);
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_toast_timers(&self) -> usize {
        self.inner.toasts.pending_timers()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "action panicked".to_string()
    }
}
