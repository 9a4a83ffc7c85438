use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::notification::{ActionOperation, NotificationCenter, NotificationKind, NotificationPayload};
use crate::sync::lock;

use super::console_models::Record;

/// Shared, ordered in-memory table of one record type.
#[derive(Clone)]
pub struct RecordStore<T: Record> {
    records: Arc<Mutex<Vec<T>>>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn list(&self) -> Vec<T> {
        lock(&self.records).clone()
    }

    /// Records matching `query`; an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<T> {
        let query = query.trim();
        lock(&self.records)
            .iter()
            .filter(|record| query.is_empty() || record.matches(query))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        lock(&self.records).iter().find(|r| r.record_id() == id).cloned()
    }

    pub fn insert(&self, record: T) -> Result<()> {
        let mut records = lock(&self.records);
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(AppError::Validation(format!(
                "Record {} already exists",
                record.record_id()
            )));
        }
        records.push(record);
        Ok(())
    }

    /// Replace the record with the same id, returning the previous version.
    pub fn update(&self, record: T) -> Result<T> {
        let mut records = lock(&self.records);
        let slot = records
            .iter_mut()
            .find(|r| r.record_id() == record.record_id())
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", record.record_id())))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Apply `change` to every record whose id is in `ids`; returns how many changed.
    pub fn update_where<F>(&self, ids: &[String], mut change: F) -> usize
    where
        F: FnMut(&mut T),
    {
        let mut records = lock(&self.records);
        let mut changed = 0;
        for record in records.iter_mut().filter(|r| ids.iter().any(|id| id == r.record_id())) {
            change(record);
            changed += 1;
        }
        changed
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        let mut records = lock(&self.records);
        let index = records.iter().position(|r| r.record_id() == id)?;
        Some(records.remove(index))
    }

    /// Put a previously removed record back at the end of the table.
    pub fn restore(&self, record: T) -> Result<()> {
        self.insert(record)
    }

    /// Remove every listed record, or none of them if any id is unknown.
    pub fn remove_all(&self, ids: &[String]) -> Result<Vec<T>> {
        let mut records = lock(&self.records);
        let missing: Vec<&str> = ids
            .iter()
            .filter(|id| !records.iter().any(|r| r.record_id() == id.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!("Records not found: {}", missing.join(", "))));
        }

        let mut removed = Vec::with_capacity(ids.len());
        records.retain(|record| {
            if ids.iter().any(|id| id == record.record_id()) {
                removed.push(record.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    /// Re-append records, skipping any id that came back in the meantime.
    pub fn restore_all(&self, restored: Vec<T>) {
        let mut records = lock(&self.records);
        for record in restored {
            if !records.iter().any(|r| r.record_id() == record.record_id()) {
                records.push(record);
            }
        }
    }

    /// Largest id that parses as a number, for handing out the next one.
    pub fn max_numeric_id(&self) -> u64 {
        lock(&self.records)
            .iter()
            .filter_map(|r| r.record_id().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

/// "Undo" for a deletion: puts the record back and confirms it.
pub struct RestoreRecord<T: Record> {
    store: RecordStore<T>,
    record: T,
    title: String,
    message: String,
}

impl<T: Record> RestoreRecord<T> {
    pub fn new(
        store: RecordStore<T>,
        record: T,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            store,
            record,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl<T: Record> ActionOperation for RestoreRecord<T> {
    fn run(&self, center: &NotificationCenter) -> anyhow::Result<()> {
        self.store.restore(self.record.clone())?;
        debug!("Restored record {}", self.record.record_id());
        center.add_notification(NotificationPayload::new(
            self.title.clone(),
            self.message.clone(),
            NotificationKind::Success,
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Item {
        id: String,
        name: String,
    }

    impl Record for Item {
        fn record_id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> String {
            self.name.clone()
        }

        fn matches(&self, query: &str) -> bool {
            self.name.to_lowercase().contains(&query.to_lowercase())
        }
    }

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn store() -> RecordStore<Item> {
        RecordStore::new(vec![item("1", "Black Hoodie"), item("2", "Leather Jacket"), item("3", "Blue Hoodie")])
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = store();
        assert_eq!(store.search("hoodie").len(), 2);
        assert_eq!(store.search("  ").len(), 3);
        assert!(store.search("dress").is_empty());
    }

    #[test]
    fn test_remove_and_restore() {
        let store = store();
        let removed = store.remove("2").unwrap();
        assert!(store.remove("2").is_none());
        assert_eq!(store.len(), 2);

        store.restore(removed.clone()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.list().last(), Some(&removed));
        assert!(store.restore(removed).is_err());
    }

    #[test]
    fn test_update_returns_previous() {
        let store = store();
        let previous = store.update(item("1", "Grey Hoodie")).unwrap();
        assert_eq!(previous.name, "Black Hoodie");
        assert_eq!(store.get("1").unwrap().name, "Grey Hoodie");
        assert!(matches!(store.update(item("9", "Ghost")), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_max_numeric_id() {
        let store = store();
        assert_eq!(store.max_numeric_id(), 3);
        store.insert(item("ORD-77", "Not numeric")).unwrap();
        assert_eq!(store.max_numeric_id(), 3);
        assert_eq!(RecordStore::<Item>::new(Vec::new()).max_numeric_id(), 0);
    }

    #[test]
    fn test_remove_all_is_all_or_nothing() {
        let store = store();
        let err = store.remove_all(&["1".to_string(), "7".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains('7')));
        assert_eq!(store.len(), 3);

        let removed = store.remove_all(&["3".to_string(), "1".to_string()]).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(store.list(), vec![item("2", "Leather Jacket")]);

        store.restore_all(removed);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_where_counts_changes() {
        let store = store();
        let ids = vec!["1".to_string(), "3".to_string(), "99".to_string()];
        let changed = store.update_where(&ids, |item| item.name.push_str(" (sale)"));
        assert_eq!(changed, 2);
        assert_eq!(store.get("3").unwrap().name, "Blue Hoodie (sale)");
        assert_eq!(store.get("2").unwrap().name, "Leather Jacket");
    }

    #[tokio::test]
    async fn test_restore_action_undoes_once() {
        let center = NotificationCenter::new(&crate::state::Config::default());
        let store = store();
        let removed = store.remove("1").unwrap();
        let undo = RestoreRecord::new(store.clone(), removed, "Item Restored", "Black Hoodie is back");

        undo.run(&center).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(center.notifications()[0].title, "Item Restored");

        assert!(undo.run(&center).is_err());
        assert_eq!(store.len(), 3);
        assert_eq!(center.len(), 1);
    }
}
