use tracing::info;

use crate::error::{AppError, Result};
use crate::notification::{NotificationCenter, NotificationKind, NotificationPayload};

use super::console_models::Record;
use super::record_store::RecordStore;

/// Delete every selected record and confirm it. If any id is unknown
/// nothing is deleted and a "Bulk Delete Failed" notification is raised.
pub fn bulk_delete<T: Record>(
    store: &RecordStore<T>,
    center: &NotificationCenter,
    ids: &[String],
    item_type: &str,
) -> Result<Vec<T>> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!("No {}s selected", item_type)));
    }
    center.ensure_accepting()?;

    let removed = match store.remove_all(ids) {
        Ok(removed) => removed,
        Err(e) => {
            center.try_add_notification(
                NotificationPayload::new(
                    "Bulk Delete Failed",
                    format!("Failed to delete selected {}s. Please try again.", item_type),
                    NotificationKind::Error,
                )
                .with_auto_close(true),
            );
            return Err(e);
        }
    };

    let confirmed = center.add_notification(
        NotificationPayload::new(
            "Bulk Delete Successful",
            format!("{} {}(s) have been permanently removed", removed.len(), item_type),
            NotificationKind::Success,
        )
        .with_auto_close(true),
    );
    if let Err(e) = confirmed {
        store.restore_all(removed);
        return Err(e);
    }

    info!("Bulk deleted {} {}s", removed.len(), item_type);
    Ok(removed)
}
