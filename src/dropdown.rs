use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::notification::{NotificationCenter, NotificationId, NotificationKind};

#[derive(Debug, Clone, Serialize)]
pub struct DropdownRow {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub time_ago: String,
    pub action_label: Option<String>,
}

/// What the notification bell renders: a badge and the newest rows.
#[derive(Debug, Clone, Serialize)]
pub struct DropdownView {
    pub rows: Vec<DropdownRow>,
    /// Records not shown because of the row limit.
    pub overflow: usize,
    pub unread_count: usize,
    pub badge: Option<String>,
    pub show_mark_all: bool,
}

impl DropdownView {
    pub fn build(center: &NotificationCenter, limit: usize, now: DateTime<Utc>) -> Self {
        let notifications = center.notifications();
        let unread_count = notifications.iter().filter(|n| !n.read).count();
        let overflow = notifications.len().saturating_sub(limit);
        let rows = notifications
            .into_iter()
            .take(limit)
            .map(|n| DropdownRow {
                time_ago: format_time_ago(n.created_at, now),
                action_label: n.action_label().map(str::to_string),
                id: n.id,
                title: n.title,
                message: n.message,
                kind: n.kind,
                read: n.read,
            })
            .collect();

        Self {
            rows,
            overflow,
            unread_count,
            badge: badge_label(unread_count),
            show_mark_all: unread_count > 0,
        }
    }

    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("{} more notifications...", self.overflow))
    }
}

pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > 99 => Some("99+".to_string()),
        n => Some(n.to_string()),
    }
}

/// Coarse relative time, using the largest unit that exceeds one.
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    let units: [(i64, &str); 5] = [
        (31_536_000, "years"),
        (2_592_000, "months"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "minutes"),
    ];
    for (size, name) in units {
        // The unit applies only when strictly more than one of it has passed.
        if seconds > size {
            return format!("{} {} ago", seconds / size, name);
        }
    }
    format!("{} seconds ago", seconds)
}
