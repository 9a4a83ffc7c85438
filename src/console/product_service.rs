use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::notification::{FollowUp, NotificationAction, NotificationCenter, NotificationKind, NotificationPayload};

use super::bulk_delete::bulk_delete;
use super::console_dto::{NewProduct, ProductUpdate};
use super::console_models::{Product, ProductStatus};
use super::record_store::{RecordStore, RestoreRecord};

const PRODUCT_ADDED_TOAST_MS: u64 = 4000;

#[derive(Clone)]
pub struct ProductService {
    store: RecordStore<Product>,
    notifications: NotificationCenter,
    next_id: Arc<AtomicU64>,
}

impl ProductService {
    pub fn new(store: RecordStore<Product>, notifications: NotificationCenter) -> Self {
        let next_id = Arc::new(AtomicU64::new(store.max_numeric_id() + 1));
        Self {
            store,
            notifications,
            next_id,
        }
    }

    pub fn store(&self) -> &RecordStore<Product> {
        &self.store
    }

    pub fn list(&self, query: Option<&str>) -> Vec<Product> {
        match query {
            Some(query) => self.store.search(query),
            None => self.store.list(),
        }
    }

    pub fn get(&self, id: &str) -> Result<Product> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    pub fn add_product(&self, payload: NewProduct) -> Result<Product> {
        payload.validate()?;
        self.notifications.ensure_accepting()?;

        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
            name: payload.name,
            category: payload.category,
            price: payload.price,
            stock: payload.stock,
            description: payload.description,
            sku: payload.sku,
            supplier: payload.supplier,
            status: ProductStatus::for_stock(payload.stock),
        };
        self.store.insert(product.clone())?;

        let added = self.notifications.add_notification(
            NotificationPayload::new(
                "Product Added",
                format!("{} has been added to inventory", product.name),
                NotificationKind::Success,
            )
            .with_duration(PRODUCT_ADDED_TOAST_MS),
        );
        if let Err(e) = added {
            self.store.remove(&product.id);
            return Err(e);
        }
        info!("Product {} added with stock {}", product.id, product.stock);

        if product.is_low_stock() {
            self.low_stock_warning(&product);
        }
        Ok(product)
    }

    fn low_stock_warning(&self, product: &Product) {
        self.notifications.try_add_notification(
            NotificationPayload::new(
                "Low Stock Warning",
                format!("{} has only {} units in stock", product.name, product.stock),
                NotificationKind::Warning,
            )
            .persistent()
            .with_action(reorder(product)),
        );
    }

    /// Apply the fields present in `update`, returning the new record.
    pub fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product> {
        update.validate()?;
        self.notifications.ensure_accepting()?;
        let previous = self.get(id)?;

        let mut product = previous.clone();
        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(supplier) = update.supplier {
            product.supplier = supplier;
        }
        if product.stock != previous.stock {
            product.status = ProductStatus::for_stock(product.stock);
        }
        self.store.update(product.clone())?;

        let confirmed = self.notifications.add_notification(
            NotificationPayload::new(
                "Product Updated",
                format!("{} has been updated successfully", product.name),
                NotificationKind::Success,
            )
            .with_auto_close(true),
        );
        if let Err(e) = confirmed {
            self.store.update(previous)?;
            return Err(e);
        }
        info!("Product {} updated", product.id);

        match (previous.is_low_stock(), product.is_low_stock()) {
            (false, true) => {
                self.notifications.try_add_notification(
                    NotificationPayload::new(
                        "Stock Alert",
                        format!("{} is running low ({} units left)", product.name, product.stock),
                        NotificationKind::Warning,
                    )
                    .persistent()
                    .with_action(reorder(&product)),
                );
            }
            (true, false) => {
                self.notifications.try_add_notification(
                    NotificationPayload::new(
                        "Stock Replenished",
                        format!("{} is back in stock with {} units", product.name, product.stock),
                        NotificationKind::Success,
                    )
                    .with_auto_close(true),
                );
            }
            _ => {}
        }

        if product.price != previous.price {
            self.notifications.try_add_notification(
                NotificationPayload::new(
                    "Price Updated",
                    format!(
                        "{} price changed from ${:.2} to ${:.2}",
                        product.name, previous.price, product.price
                    ),
                    NotificationKind::Info,
                )
                .with_auto_close(true),
            );
        }

        Ok(product)
    }

    /// Remove a product, reverting the delete if its "Undo" notification
    /// cannot be raised.
    pub fn delete_product(&self, id: &str) -> Result<Product> {
        self.notifications.ensure_accepting()?;
        let product = self
            .store
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let undo = RestoreRecord::new(
            self.store.clone(),
            product.clone(),
            "Product Restored",
            format!("{} has been restored to inventory", product.name),
        );
        let confirmed = self.notifications.add_notification(
            NotificationPayload::new(
                "Product Deleted",
                format!("{} has been removed from inventory", product.name),
                NotificationKind::Success,
            )
            .with_auto_close(true)
            .with_action(NotificationAction::new("Undo", undo)),
        );
        if let Err(e) = confirmed {
            self.store.restore(product)?;
            return Err(e);
        }

        info!("Product {} deleted", product.id);
        Ok(product)
    }

    pub fn bulk_delete_products(&self, ids: &[String]) -> Result<Vec<Product>> {
        bulk_delete(&self.store, &self.notifications, ids, "product")
    }
}

fn reorder(product: &Product) -> NotificationAction {
    NotificationAction::new(
        "Reorder",
        FollowUp::new(
            "Reorder Initiated",
            format!("Reorder request sent to {} for {}", product.supplier, product.name),
            NotificationKind::Info,
        ),
    )
}
