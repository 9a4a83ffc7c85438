use tracing::info;

use crate::error::{AppError, Result};
use crate::notification::{FollowUp, NotificationAction, NotificationCenter, NotificationKind, NotificationPayload};

use super::bulk_delete::bulk_delete;
use super::console_models::{Order, OrderStatus};
use super::record_store::{RecordStore, RestoreRecord};

#[derive(Clone)]
pub struct OrderService {
    store: RecordStore<Order>,
    notifications: NotificationCenter,
}

impl OrderService {
    pub fn new(store: RecordStore<Order>, notifications: NotificationCenter) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub fn store(&self) -> &RecordStore<Order> {
        &self.store
    }

    pub fn list(&self, query: Option<&str>) -> Vec<Order> {
        match query {
            Some(query) => self.store.search(query),
            None => self.store.list(),
        }
    }

    pub fn get(&self, id: &str) -> Result<Order> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    /// Remove an order. As with customers, a delete whose "Undo"
    /// notification cannot be raised is reverted.
    pub fn delete_order(&self, id: &str) -> Result<Order> {
        self.notifications.ensure_accepting()?;
        let order = self
            .store
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        let undo = RestoreRecord::new(
            self.store.clone(),
            order.clone(),
            "Order Restored",
            format!("Order {} has been restored", order.id),
        );
        let confirmed = self.notifications.add_notification(
            NotificationPayload::new(
                "Order Deleted",
                format!("Order {} has been deleted successfully", order.id),
                NotificationKind::Success,
            )
            .with_auto_close(true)
            .with_action(NotificationAction::new("Undo", undo)),
        );
        if let Err(e) = confirmed {
            self.store.restore(order)?;
            return Err(e);
        }
        info!("Order {} deleted", order.id);

        self.notifications.try_add_notification(
            NotificationPayload::new(
                "Customer Notification",
                format!("Notify {} about order cancellation", order.customer_name),
                NotificationKind::Warning,
            )
            .persistent()
            .with_action(NotificationAction::new(
                "Send Refund",
                FollowUp::new(
                    "Refund Initiated",
                    format!("Refund process started for {}", order.customer_name),
                    NotificationKind::Info,
                ),
            )),
        );

        Ok(order)
    }

    pub fn bulk_delete_orders(&self, ids: &[String]) -> Result<Vec<Order>> {
        bulk_delete(&self.store, &self.notifications, ids, "order")
    }

    /// Move one order to `status`, returning its previous status.
    pub fn update_status(&self, id: &str, status: OrderStatus) -> Result<OrderStatus> {
        self.notifications.ensure_accepting()?;
        let mut order = self.get(id)?;
        let previous = order.status;
        order.status = status;
        let before = self.store.update(order.clone())?;

        let kind = match status {
            OrderStatus::Delivered => NotificationKind::Success,
            OrderStatus::Cancelled => NotificationKind::Error,
            _ => NotificationKind::Info,
        };
        let mut payload = NotificationPayload::new(
            "Order Status Updated",
            format!("{}: {}", order.id, status.update_message()),
            kind,
        )
        .with_auto_close(true);
        if status == OrderStatus::Shipped {
            payload = payload.with_action(NotificationAction::new(
                "Track Package",
                FollowUp::new(
                    "Tracking Information",
                    format!("Tracking details for {} sent to {}", order.id, order.customer_email),
                    NotificationKind::Info,
                ),
            ));
        }
        if let Err(e) = self.notifications.add_notification(payload) {
            self.store.update(before)?;
            return Err(e);
        }
        info!("Order {} moved from {} to {}", order.id, previous, status);

        if matches!(status, OrderStatus::Shipped | OrderStatus::Delivered) {
            self.notifications.try_add_notification(
                NotificationPayload::new(
                    "Customer Notification",
                    format!("Notify {} that order {} is {}", order.customer_name, order.id, status),
                    NotificationKind::Info,
                )
                .persistent(),
            );
        }

        Ok(previous)
    }

    /// Set `status` on every listed order; unknown ids are skipped.
    pub fn bulk_update_status(&self, ids: &[String], status: OrderStatus) -> Result<usize> {
        self.notifications.ensure_accepting()?;
        let mut previous = Vec::new();
        let changed = self.store.update_where(ids, |order| {
            previous.push((order.id.clone(), order.status));
            order.status = status;
        });

        let confirmed = self.notifications.add_notification(
            NotificationPayload::new(
                "Bulk Update Complete",
                format!("{} orders updated to {}", changed, status),
                NotificationKind::Success,
            )
            .with_auto_close(true),
        );
        if let Err(e) = confirmed {
            for (id, old_status) in previous {
                self.store.update_where(&[id], |order| order.status = old_status);
            }
            return Err(e);
        }

        info!("Bulk status update to {} touched {} orders", status, changed);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::mock_data::generate_orders;
    use crate::state::Config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service() -> (OrderService, NotificationCenter) {
        let center = NotificationCenter::new(&Config::default());
        let store = RecordStore::new(generate_orders(&mut StdRng::seed_from_u64(21), 20));
        (OrderService::new(store, center.clone()), center)
    }

    #[tokio::test]
    async fn test_shipped_update_raises_tracking_and_customer_notice() {
        let (service, center) = service();
        service.update_status("ORD-004", OrderStatus::Shipped).unwrap();
        assert_eq!(service.get("ORD-004").unwrap().status, OrderStatus::Shipped);

        let notifications = center.notifications();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].title, "Customer Notification");
        assert!(!notifications[0].auto_close);

        let update = &notifications[1];
        assert_eq!(update.title, "Order Status Updated");
        assert_eq!(update.message, "ORD-004: Order has been shipped");
        assert_eq!(update.kind, NotificationKind::Info);
        assert_eq!(update.action_label(), Some("Track Package"));

        assert!(center.trigger_action(update.id));
        assert_eq!(center.notifications()[0].title, "Tracking Information");
    }

    #[tokio::test]
    async fn test_status_kinds() {
        let (service, center) = service();

        service.update_status("ORD-001", OrderStatus::Cancelled).unwrap();
        assert_eq!(center.notifications()[0].kind, NotificationKind::Error);
        assert_eq!(center.len(), 1);

        service.update_status("ORD-001", OrderStatus::Delivered).unwrap();
        assert_eq!(center.notifications()[1].kind, NotificationKind::Success);
        assert_eq!(center.len(), 3);

        let previous = service.update_status("ORD-001", OrderStatus::Processing).unwrap();
        assert_eq!(previous, OrderStatus::Delivered);
        assert!(center.notifications()[0].action.is_none());
    }

    #[tokio::test]
    async fn test_delete_order_with_refund_and_undo() {
        let (service, center) = service();
        let order = service.delete_order("ORD-002").unwrap();
        assert_eq!(service.list(None).len(), 19);

        let notifications = center.notifications();
        assert_eq!(notifications[0].title, "Customer Notification");
        assert_eq!(notifications[0].action_label(), Some("Send Refund"));
        assert_eq!(notifications[1].title, "Order Deleted");

        assert!(center.trigger_action(notifications[0].id));
        assert_eq!(center.notifications()[0].title, "Refund Initiated");

        assert!(center.trigger_action(notifications[1].id));
        assert_eq!(service.get("ORD-002").unwrap(), order);
        assert_eq!(center.notifications()[0].title, "Order Restored");
    }

    #[tokio::test]
    async fn test_bulk_update_skips_unknown() {
        let (service, center) = service();
        let ids = vec!["ORD-001".to_string(), "ORD-003".to_string(), "ORD-999".to_string()];
        let changed = service.bulk_update_status(&ids, OrderStatus::Delivered).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(service.get("ORD-003").unwrap().status, OrderStatus::Delivered);
        assert_eq!(center.notifications()[0].message, "2 orders updated to delivered");
    }

    #[tokio::test]
    async fn test_mutations_after_shutdown_change_nothing() {
        let (service, center) = service();
        let before = service.list(None);
        center.shutdown();

        assert!(matches!(service.delete_order("ORD-005"), Err(AppError::ShutDown)));
        assert!(matches!(
            service.update_status("ORD-005", OrderStatus::Cancelled),
            Err(AppError::ShutDown)
        ));
        let ids = vec!["ORD-001".to_string(), "ORD-002".to_string()];
        assert!(matches!(
            service.bulk_update_status(&ids, OrderStatus::Cancelled),
            Err(AppError::ShutDown)
        ));
        assert!(matches!(service.bulk_delete_orders(&ids), Err(AppError::ShutDown)));
        assert_eq!(service.list(None), before);
    }

    #[test]
    fn test_delete_outside_runtime_keeps_order() {
        let (service, _center) = service();
        assert!(matches!(service.delete_order("ORD-005"), Err(AppError::NoRuntime)));
        assert!(service.get("ORD-005").is_ok());
    }

    #[tokio::test]
    async fn test_bulk_delete_orders() {
        let (service, center) = service();
        let ids = vec!["ORD-001".to_string(), "ORD-020".to_string()];
        assert_eq!(service.bulk_delete_orders(&ids).unwrap().len(), 2);
        assert_eq!(service.list(None).len(), 18);
        assert_eq!(center.notifications()[0].title, "Bulk Delete Successful");
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (service, center) = service();
        assert!(matches!(
            service.update_status("ORD-999", OrderStatus::Shipped),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete_order("nope"), Err(AppError::NotFound(_))));
        assert!(center.is_empty());
    }
}
