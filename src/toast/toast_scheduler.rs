use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::events::{BusEvent, ToastShownPayload};
use crate::notification::NotificationKind;
use crate::sync::lock;

use super::toast_models::{DismissReason, Toast, ToastId};

#[derive(Default)]
struct ToastState {
    visible: Vec<Toast>,
    timers: HashMap<ToastId, JoinHandle<()>>,
    closed: bool,
}

/// Owns the visible toasts and one expiry timer per toast.
///
/// Showing a toast appends it and arms its timer under the same lock, so a
/// timer can never observe a toast that is half registered.
#[derive(Clone)]
pub struct ToastScheduler {
    state: Arc<Mutex<ToastState>>,
    events: broadcast::Sender<BusEvent>,
    default_duration: Duration,
}

impl ToastScheduler {
    pub fn new(events: broadcast::Sender<BusEvent>, default_duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ToastState::default())),
            events,
            default_duration,
        }
    }

    /// Display a toast and schedule its removal.
    ///
    /// Fails with [`AppError::NoRuntime`] when called outside a Tokio
    /// runtime; in that case nothing is displayed.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Option<Duration>,
    ) -> Result<ToastId> {
        let duration = duration.unwrap_or(self.default_duration);
        let toast = Toast {
            id: ToastId::next(),
            message: message.into(),
            kind,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            shown_at: Utc::now(),
        };
        let id = toast.id;
        let shown = ToastShownPayload::from(&toast);

        let runtime = Handle::try_current().map_err(|_| AppError::NoRuntime)?;

        {
            let mut state = lock(&self.state);
            if state.closed {
                return Err(AppError::ShutDown);
            }
            state.visible.push(toast);

            let expiry = ExpiryHandle {
                state: Arc::downgrade(&self.state),
                events: self.events.clone(),
            };
            let timer = runtime.spawn(async move {
                tokio::time::sleep(duration).await;
                expiry.expire(id);
            });
            state.timers.insert(id, timer);
        }

        debug!("Toast {} shown for {:?}", id, duration);
        let _ = self.events.send(BusEvent::ToastShown(shown));
        Ok(id)
    }

    /// Manual dismissal. Removing an id that is already gone is a no-op.
    pub fn remove(&self, id: ToastId) -> bool {
        remove_toast(&self.state, &self.events, id, DismissReason::Dismissed)
    }

    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.state).visible.clone()
    }

    pub fn pending_timers(&self) -> usize {
        lock(&self.state).timers.len()
    }

    /// Abort every outstanding timer and drop all visible toasts.
    pub fn shutdown(&self) {
        let mut state = lock(&self.state);
        state.closed = true;
        let aborted = state.timers.len();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.visible.clear();
        debug!("Toast scheduler shut down, {} timers aborted", aborted);
    }
}

/// What an expiry timer keeps. Holding only a weak reference means a timer
/// that outlives its scheduler fires into nothing.
struct ExpiryHandle {
    state: Weak<Mutex<ToastState>>,
    events: broadcast::Sender<BusEvent>,
}

impl ExpiryHandle {
    fn expire(self, id: ToastId) {
        if let Some(state) = self.state.upgrade() {
            remove_toast(&state, &self.events, id, DismissReason::Expired);
        }
    }
}

fn remove_toast(
    state: &Mutex<ToastState>,
    events: &broadcast::Sender<BusEvent>,
    id: ToastId,
    reason: DismissReason,
) -> bool {
    let removed = {
        let mut state = lock(state);
        let timer = state.timers.remove(&id);
        if reason == DismissReason::Dismissed {
            if let Some(timer) = timer {
                timer.abort();
            }
        }
        match state.visible.iter().position(|toast| toast.id == id) {
            Some(index) => {
                state.visible.remove(index);
                true
            }
            None => false,
        }
    };

    if removed {
        debug!("Toast {} removed ({})", id, reason);
        let _ = events.send(BusEvent::ToastDismissed { id, reason });
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (ToastScheduler, broadcast::Receiver<BusEvent>) {
        let (tx, rx) = broadcast::channel(32);
        (ToastScheduler::new(tx, Duration::from_millis(5000)), rx)
    }

    fn dismissals(rx: &mut broadcast::Receiver<BusEvent>) -> Vec<(ToastId, DismissReason)> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let BusEvent::ToastDismissed { id, reason } = event {
                out.push((id, reason));
            }
        }
        out
    }

    #[test]
    fn test_show_without_runtime_is_an_error() {
        let (toasts, mut rx) = scheduler();
        let result = toasts.show("Saved", NotificationKind::Success, None);
        assert!(matches!(result, Err(AppError::NoRuntime)));
        assert!(toasts.toasts().is_empty());
        assert_eq!(toasts.pending_timers(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let (toasts, _rx) = scheduler();
        let id = toasts.show("Saved", NotificationKind::Success, Some(Duration::from_millis(1000))).unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(toasts.toasts().len(), 1);
        assert_eq!(toasts.toasts()[0].id, id);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(toasts.toasts().is_empty());
        assert_eq!(toasts.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_duration_applies() {
        let (toasts, _rx) = scheduler();
        toasts.show("Default", NotificationKind::Info, None).unwrap();
        assert_eq!(toasts.toasts()[0].duration_ms, 5000);

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(toasts.toasts().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(toasts.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_then_timer_is_noop() {
        let (toasts, mut rx) = scheduler();
        let id = toasts.show("Bye", NotificationKind::Info, Some(Duration::from_millis(1000))).unwrap();

        assert!(toasts.remove(id));
        assert!(toasts.toasts().is_empty());
        assert_eq!(toasts.pending_timers(), 0);
        assert!(!toasts.remove(id));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(dismissals(&mut rx), vec![(id, DismissReason::Dismissed)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_out_of_creation_order() {
        let (toasts, mut rx) = scheduler();
        let long = toasts.show("long", NotificationKind::Info, Some(Duration::from_millis(3000))).unwrap();
        let short = toasts.show("short", NotificationKind::Warning, Some(Duration::from_millis(1000))).unwrap();

        let order: Vec<ToastId> = toasts.toasts().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![long, short]);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let remaining: Vec<ToastId> = toasts.toasts().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![long]);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(toasts.toasts().is_empty());
        assert_eq!(
            dismissals(&mut rx),
            vec![(short, DismissReason::Expired), (long, DismissReason::Expired)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_timers() {
        let (toasts, mut rx) = scheduler();
        toasts.show("a", NotificationKind::Info, None).unwrap();
        toasts.show("b", NotificationKind::Info, None).unwrap();
        assert_eq!(toasts.pending_timers(), 2);

        toasts.shutdown();
        assert!(toasts.toasts().is_empty());
        assert_eq!(toasts.pending_timers(), 0);
        assert!(matches!(
            toasts.show("c", NotificationKind::Info, None),
            Err(AppError::ShutDown)
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(dismissals(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_after_scheduler_dropped_is_noop() {
        let (toasts, mut rx) = scheduler();
        toasts.show("orphan", NotificationKind::Info, Some(Duration::from_millis(100))).unwrap();
        drop(toasts);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(dismissals(&mut rx).is_empty());
    }
}
