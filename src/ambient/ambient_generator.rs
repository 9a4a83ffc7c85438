use futures::stream::{self, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::notification::NotificationCenter;

use super::ambient_source::{AmbientTier, EventSource};

/// Owner of a running generator. Dropping it cancels the generator.
pub struct AmbientHandle {
    id: u64,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
    center: NotificationCenter,
}

impl AmbientHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn stop(&mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            self.center.unregister_generator(self.id);
            info!("Ambient generator {} cancelled", self.id);
        }
    }
}

impl Drop for AmbientHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a background task that ticks every tier on its own period and
/// feeds whatever `source` draws into the center. The first tick of each
/// tier happens one full period after start.
pub fn start_ambient_generator<S: EventSource>(
    center: &NotificationCenter,
    mut source: S,
    tiers: Vec<AmbientTier>,
) -> AmbientHandle {
    let (id, token) = center.register_generator();
    let task_center = center.clone();
    let task_token = token.clone();
    let names: Vec<&'static str> = tiers.iter().map(|tier| tier.name).collect();

    let task = tokio::spawn(async move {
        let start = Instant::now();
        let mut ticks = stream::select_all(tiers.iter().enumerate().map(|(index, tier)| {
            let mut interval = tokio::time::interval_at(start + tier.period, tier.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            IntervalStream::new(interval).map(move |_| index)
        }));

        loop {
            tokio::select! {
                _ = task_token.cancelled() => break,
                tick = ticks.next() => {
                    let Some(index) = tick else {
                        task_token.cancelled().await;
                        break;
                    };
                    let tier = &tiers[index];
                    let Some(payload) = source.draw(tier) else {
                        continue;
                    };
                    match task_center.add_notification(payload) {
                        Ok(notification_id) => {
                            debug!("Ambient tier '{}' raised {}", tier.name, notification_id)
                        }
                        Err(e) => warn!("Ambient tier '{}' could not notify: {}", tier.name, e),
                    }
                }
            }
        }

        task_center.unregister_generator(id);
        debug!("Ambient generator {} stopped", id);
    });

    info!("Ambient generator {} started for tiers {:?}", id, names);
    AmbientHandle {
        id,
        token,
        task: Some(task),
        center: center.clone(),
    }
}
