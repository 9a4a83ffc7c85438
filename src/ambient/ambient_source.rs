use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

use crate::notification::{Navigate, NotificationAction, NotificationKind, NotificationPayload};

/// Placeholder replaced by a random number when a template is rendered.
const NUMBER_PLACEHOLDER: &str = "{n}";

#[derive(Debug, Clone)]
pub struct TemplateAction {
    pub label: &'static str,
    pub route: &'static str,
}

/// One candidate event in a tier's pool.
#[derive(Debug, Clone)]
pub struct AmbientTemplate {
    pub title: &'static str,
    pub message: &'static str,
    pub kind: NotificationKind,
    /// Upper bound (exclusive) for the number substituted into `{n}`.
    pub number_below: Option<u32>,
    pub action: Option<TemplateAction>,
}

impl AmbientTemplate {
    const fn new(title: &'static str, message: &'static str, kind: NotificationKind) -> Self {
        Self {
            title,
            message,
            kind,
            number_below: None,
            action: None,
        }
    }

    pub fn render(&self, number: Option<u32>) -> NotificationPayload {
        let message = match number {
            Some(n) => self.message.replace(NUMBER_PLACEHOLDER, &n.to_string()),
            None => self.message.to_string(),
        };
        let payload = NotificationPayload::new(self.title, message, self.kind);
        match &self.action {
            Some(action) => payload.with_action(NotificationAction::new(action.label, Navigate::new(action.route))),
            None => payload,
        }
    }
}

/// A recurring category of synthetic events.
#[derive(Debug, Clone)]
pub struct AmbientTier {
    pub name: &'static str,
    pub period: Duration,
    pub probability: f64,
    pub templates: Vec<AmbientTemplate>,
}

impl AmbientTier {
    /// Live platform activity, checked every 30 seconds.
    pub fn activity() -> Self {
        Self {
            name: "activity",
            period: Duration::from_secs(30),
            probability: 0.3,
            templates: vec![
                AmbientTemplate {
                    number_below: Some(1000),
                    ..AmbientTemplate::new(
                        "New Customer Registered",
                        "Customer {n} has joined the platform",
                        NotificationKind::Success,
                    )
                },
                AmbientTemplate {
                    number_below: Some(50),
                    ..AmbientTemplate::new(
                        "Stock Alert",
                        "Product {n} is running low on stock",
                        NotificationKind::Warning,
                    )
                },
                AmbientTemplate {
                    number_below: Some(999),
                    ..AmbientTemplate::new(
                        "Order Update",
                        "Order #ORD-{n} has been shipped",
                        NotificationKind::Info,
                    )
                },
            ],
        }
    }

    /// Dashboard business insights, checked every 45 seconds.
    pub fn insights() -> Self {
        Self {
            name: "insights",
            period: Duration::from_secs(45),
            probability: 0.2,
            templates: vec![
                AmbientTemplate::new(
                    "Sales Milestone",
                    "Congratulations! You've reached $50,000 in monthly sales",
                    NotificationKind::Success,
                ),
                AmbientTemplate {
                    action: Some(TemplateAction {
                        label: "View Items",
                        route: "/products",
                    }),
                    ..AmbientTemplate::new(
                        "Inventory Alert",
                        "5 products are running low on stock and need reordering",
                        NotificationKind::Warning,
                    )
                },
                AmbientTemplate::new(
                    "Customer Growth",
                    "10 new customers joined this week",
                    NotificationKind::Info,
                ),
                AmbientTemplate::new(
                    "Payment Reminder",
                    "3 invoices are overdue and require attention",
                    NotificationKind::Warning,
                ),
            ],
        }
    }

    /// Dashboard health checks, once a minute.
    pub fn performance() -> Self {
        Self {
            name: "performance",
            period: Duration::from_secs(60),
            probability: 0.1,
            templates: vec![
                AmbientTemplate::new(
                    "System Performance",
                    "All systems running optimally",
                    NotificationKind::Success,
                ),
                AmbientTemplate::new(
                    "Backup Complete",
                    "Daily data backup completed successfully",
                    NotificationKind::Success,
                ),
                AmbientTemplate::new(
                    "Security Scan",
                    "Weekly security scan completed - no issues found",
                    NotificationKind::Success,
                ),
            ],
        }
    }

    /// The tiers shown while the dashboard is open.
    pub fn dashboard() -> Vec<Self> {
        vec![Self::insights(), Self::performance()]
    }
}

/// Decides, per tick, whether a tier fires and with what.
pub trait EventSource: Send + 'static {
    fn draw(&mut self, tier: &AmbientTier) -> Option<NotificationPayload>;
}

pub struct RandomEventSource {
    rng: StdRng,
}

impl RandomEventSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for RandomEventSource {
    fn draw(&mut self, tier: &AmbientTier) -> Option<NotificationPayload> {
        if tier.templates.is_empty() || self.rng.random::<f64>() >= tier.probability {
            return None;
        }
        let template = &tier.templates[self.rng.random_range(0..tier.templates.len())];
        let number = template
            .number_below
            .filter(|&max| max > 0)
            .map(|max| self.rng.random_range(0..max));
        Some(template.render(number))
    }
}

/// Replays a fixed list of outcomes, one per tick, regardless of tier.
/// `None` entries are ticks that do not fire. Once exhausted nothing fires.
#[derive(Default)]
pub struct ScriptedEventSource {
    outcomes: VecDeque<Option<NotificationPayload>>,
    draws: usize,
}

impl ScriptedEventSource {
    pub fn new(outcomes: impl IntoIterator<Item = Option<NotificationPayload>>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            draws: 0,
        }
    }

    /// Always fire the tier's first template, rendered with `{n}` = 0.
    pub fn from_tier_templates(tier: &AmbientTier, ticks: usize) -> Self {
        let outcomes = tier
            .templates
            .first()
            .map(|template| template.render(template.number_below.map(|_| 0)));
        Self::new(std::iter::repeat(outcomes).take(ticks))
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl EventSource for ScriptedEventSource {
    fn draw(&mut self, _tier: &AmbientTier) -> Option<NotificationPayload> {
        self.draws += 1;
        self.outcomes.pop_front().flatten()
    }
}
