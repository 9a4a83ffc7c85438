use std::collections::VecDeque;

use super::notification_models::{Notification, NotificationId};

/// Newest-first sequence of persistent notifications.
///
/// Insertion order is the only ordering. Marking a record read never moves it.
#[derive(Debug, Default)]
pub struct NotificationStore {
    records: VecDeque<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, notification: Notification) {
        self.records.push_front(notification);
    }

    /// Append older records behind everything already stored.
    pub fn append_history(&mut self, history: impl IntoIterator<Item = Notification>) {
        for notification in history {
            if self.position(notification.id).is_none() {
                self.records.push_back(notification);
            }
        }
    }

    /// Returns `true` only when the record flipped from unread to read.
    pub fn mark_as_read(&mut self, id: NotificationId) -> bool {
        match self.records.iter_mut().find(|n| n.id == id) {
            Some(notification) if !notification.read => {
                notification.read = true;
                true
            }
            _ => false,
        }
    }

    /// Returns how many records changed.
    pub fn mark_all_as_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.records.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.position(id)?;
        self.records.remove(index)
    }

    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.records.iter().find(|n| n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|n| !n.read).count()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: NotificationId) -> Option<usize> {
        self.records.iter().position(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::notification_dto::NotificationPayload;
    use crate::notification::notification_models::NotificationKind;

    fn record(title: &str) -> Notification {
        Notification::from_payload(NotificationPayload::new(title, "body", NotificationKind::Info))
    }

    fn titles(store: &NotificationStore) -> Vec<String> {
        store.snapshot().into_iter().map(|n| n.title).collect()
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut store = NotificationStore::new();
        store.prepend(record("first"));
        store.prepend(record("second"));
        store.prepend(record("third"));
        assert_eq!(titles(&store), vec!["third", "second", "first"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_mark_middle_as_read_keeps_position() {
        let mut store = NotificationStore::new();
        store.prepend(record("a"));
        let middle = record("b");
        let middle_id = middle.id;
        store.prepend(middle);
        store.prepend(record("c"));

        assert!(store.mark_as_read(middle_id));
        assert_eq!(store.unread_count(), 2);
        assert_eq!(titles(&store), vec!["c", "b", "a"]);
        assert!(store.snapshot()[1].read);
    }

    #[test]
    fn test_mark_as_read_is_noop_for_unknown_or_read() {
        let mut store = NotificationStore::new();
        let notification = record("a");
        let id = notification.id;
        store.prepend(notification);

        assert!(store.mark_as_read(id));
        assert!(!store.mark_as_read(id));
        assert!(!store.mark_as_read(NotificationId::next()));
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_mark_all_as_read_is_idempotent() {
        let mut store = NotificationStore::new();
        store.prepend(record("a"));
        store.prepend(record("b"));
        assert_eq!(store.mark_all_as_read(), 2);
        assert_eq!(store.mark_all_as_read(), 0);
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = NotificationStore::new();
        store.prepend(record("a"));
        let target = record("b");
        let id = target.id;
        store.prepend(target);

        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert_eq!(titles(&store), vec!["a"]);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = NotificationStore::new();
        store.prepend(record("a"));
        store.prepend(record("b"));
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_append_history_goes_behind_live_records() {
        let mut store = NotificationStore::new();
        store.prepend(record("live"));
        let old = record("old");
        let duplicate = old.clone();
        store.append_history(vec![old, duplicate]);
        assert_eq!(titles(&store), vec!["live", "old"]);
    }
}
