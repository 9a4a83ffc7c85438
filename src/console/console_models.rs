use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Products below this stock level are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// A business record the console can list, search and restore.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    fn record_id(&self) -> &str;

    /// Name used in notification messages.
    fn display_name(&self) -> String;

    /// Case-insensitive match over the fields the search box covers.
    fn matches(&self, query: &str) -> bool;
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub total_orders: u32,
    pub total_spent: u64,
    pub status: CustomerStatus,
    pub join_date: NaiveDate,
}

impl Record for Customer {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        contains_ignore_case(&self.name, &needle)
            || contains_ignore_case(&self.email, &needle)
            || self.phone.contains(query)
            || contains_ignore_case(&self.city, &needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Sentence shown when an order moves into this status.
    pub fn update_message(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order is now pending review",
            OrderStatus::Processing => "Order is being processed",
            OrderStatus::Shipped => "Order has been shipped",
            OrderStatus::Delivered => "Order has been delivered",
            OrderStatus::Cancelled => "Order has been cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub products: Vec<String>,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub shipping_address: String,
}

impl Record for Order {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.id.clone()
    }

    fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        contains_ignore_case(&self.id, &needle)
            || contains_ignore_case(&self.customer_name, &needle)
            || contains_ignore_case(&self.customer_email, &needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
    LowStock,
}

impl ProductStatus {
    pub fn for_stock(stock: u32) -> Self {
        if stock < LOW_STOCK_THRESHOLD {
            ProductStatus::LowStock
        } else {
            ProductStatus::Active
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub description: String,
    pub sku: String,
    pub supplier: String,
    pub status: ProductStatus,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

impl Record for Product {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        contains_ignore_case(&self.name, &needle)
            || contains_ignore_case(&self.category, &needle)
            || contains_ignore_case(&self.sku, &needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: "1".to_string(),
            name: "Fashion Store A".to_string(),
            email: "customer1@example.com".to_string(),
            phone: "+998 (90) 123 - 45 - 67".to_string(),
            address: "Street 1, Building 4".to_string(),
            city: "Tashkent".to_string(),
            total_orders: 12,
            total_spent: 4200,
            status: CustomerStatus::Active,
            join_date: NaiveDate::from_ymd_opt(2023, 5, 14).unwrap(),
        }
    }

    #[test]
    fn test_customer_search_fields() {
        let c = customer();
        assert!(c.matches("fashion"));
        assert!(c.matches("CUSTOMER1@"));
        assert!(c.matches("123 - 45"));
        assert!(c.matches("tash"));
        assert!(!c.matches("samarkand"));
    }

    #[test]
    fn test_order_status_display_and_messages() {
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(OrderStatus::Cancelled.update_message(), "Order has been cancelled");
        assert_eq!(OrderStatus::ALL.len(), 5);
    }

    #[test]
    fn test_product_status_for_stock() {
        assert_eq!(ProductStatus::for_stock(9), ProductStatus::LowStock);
        assert_eq!(ProductStatus::for_stock(10), ProductStatus::Active);
    }

    #[test]
    fn test_customer_serialization() {
        let json = serde_json::to_value(customer()).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["join_date"], "2023-05-14");
    }
}
