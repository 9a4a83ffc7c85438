use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::notification::{FollowUp, NotificationAction, NotificationCenter, NotificationKind, NotificationPayload};

use super::bulk_delete::bulk_delete;
use super::console_dto::NewCustomer;
use super::console_models::{Customer, CustomerStatus, Record};
use super::record_store::{RecordStore, RestoreRecord};

/// Customer table operations and the notifications they raise.
#[derive(Clone)]
pub struct CustomerService {
    store: RecordStore<Customer>,
    notifications: NotificationCenter,
    next_id: Arc<AtomicU64>,
}

impl CustomerService {
    pub fn new(store: RecordStore<Customer>, notifications: NotificationCenter) -> Self {
        let next_id = Arc::new(AtomicU64::new(store.max_numeric_id() + 1));
        Self {
            store,
            notifications,
            next_id,
        }
    }

    pub fn store(&self) -> &RecordStore<Customer> {
        &self.store
    }

    pub fn list(&self, query: Option<&str>) -> Vec<Customer> {
        match query {
            Some(query) => self.store.search(query),
            None => self.store.list(),
        }
    }

    pub fn get(&self, id: &str) -> Result<Customer> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    pub fn add_customer(&self, payload: NewCustomer) -> Result<Customer> {
        payload.validate()?;
        self.notifications.ensure_accepting()?;

        let customer = Customer {
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            total_orders: 0,
            total_spent: 0,
            status: CustomerStatus::Active,
            join_date: Utc::now().date_naive(),
        };
        self.store.insert(customer.clone())?;
        tracing::info!("Customer {} added", customer.id);

        let added = self.notifications.add_notification(
            NotificationPayload::new(
                "New Customer Added",
                format!("{} has been successfully added to the customer database", customer.name),
                NotificationKind::Success,
            )
            .with_auto_close(true)
            .with_action(NotificationAction::new(
                "View Profile",
                FollowUp::new(
                    "Customer Profile",
                    format!("Viewing profile for {}", customer.name),
                    NotificationKind::Info,
                ),
            )),
        );
        if let Err(e) = added {
            self.store.remove(&customer.id);
            return Err(e);
        }

        self.notifications.try_add_notification(
            NotificationPayload::new(
                "Welcome New Customer",
                format!("Send welcome email to {} at {}", customer.name, customer.email),
                NotificationKind::Info,
            )
            .persistent()
            .with_action(NotificationAction::new(
                "Send Email",
                FollowUp::new(
                    "Welcome Email Sent",
                    format!("Welcome email sent to {}", customer.email),
                    NotificationKind::Success,
                ),
            )),
        );

        Ok(customer)
    }

    pub fn edit_customer(&self, id: &str) -> Result<Customer> {
        let customer = self.get(id)?;
        self.notifications.add_notification(
            NotificationPayload::new(
                "Editing Customer",
                format!("Opening edit form for {}", customer.name),
                NotificationKind::Info,
            )
            .with_auto_close(true),
        )?;
        Ok(customer)
    }

    /// Remove a customer. The record survives only inside the "Undo"
    /// action, so if that notification cannot be raised the delete is
    /// reverted.
    pub fn delete_customer(&self, id: &str) -> Result<Customer> {
        self.notifications.ensure_accepting()?;
        let customer = self
            .store
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;

        let name = customer.display_name();
        let undo = RestoreRecord::new(
            self.store.clone(),
            customer.clone(),
            "Customer Restored",
            format!("{} has been restored to the database", name),
        );
        let confirmed = self.notifications.add_notification(
            NotificationPayload::new(
                "Customer Deleted",
                format!("{} has been permanently removed from the database", name),
                NotificationKind::Success,
            )
            .with_auto_close(true)
            .with_action(NotificationAction::new("Undo", undo)),
        );
        if let Err(e) = confirmed {
            self.store.restore(customer)?;
            return Err(e);
        }

        tracing::info!("Customer {} deleted", customer.record_id());
        Ok(customer)
    }

    pub fn bulk_delete_customers(&self, ids: &[String]) -> Result<Vec<Customer>> {
        bulk_delete(&self.store, &self.notifications, ids, "customer")
    }
}
