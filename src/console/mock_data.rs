use chrono::NaiveDate;
use rand::Rng;

use super::console_models::{Customer, CustomerStatus, Order, OrderStatus, Product, ProductStatus};

const STORE_NAMES: [&str; 10] = [
    "Fashion Store A",
    "Retail Chain B",
    "Boutique C",
    "Store D",
    "Clothing Hub E",
    "Style Center F",
    "Fashion Point G",
    "Trendy Shop H",
    "Modern Wear I",
    "Classic Store J",
];

const CITIES: [&str; 8] = [
    "Tashkent",
    "Samarkand",
    "Bukhara",
    "Andijan",
    "Namangan",
    "Fergana",
    "Nukus",
    "Termez",
];

const PRODUCT_NAMES: [&str; 8] = [
    "Classic White T-Shirt",
    "Blue Denim Jeans",
    "Summer Floral Dress",
    "Leather Jacket",
    "Cotton Polo Shirt",
    "Black Hoodie",
    "Casual Shorts",
    "Evening Dress",
];

const CATEGORIES: [&str; 4] = ["T-Shirts", "Jeans", "Dresses", "Jackets"];
const SUPPLIERS: [&str; 4] = ["Cotton Co.", "Denim Works", "Fashion Plus", "Leather Craft"];

fn random_date<R: Rng>(rng: &mut R, year: i32) -> NaiveDate {
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn generate_customers<R: Rng>(rng: &mut R, count: usize) -> Vec<Customer> {
    (0..count)
        .map(|i| {
            let number = i + 1;
            Customer {
                id: number.to_string(),
                name: STORE_NAMES
                    .get(i)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("Customer {}", number)),
                email: format!("customer{}@example.com", number),
                phone: format!(
                    "+998 ({}) {} - {} - {}",
                    rng.random_range(10..100),
                    rng.random_range(100..1000),
                    rng.random_range(10..100),
                    rng.random_range(10..100)
                ),
                address: format!("Street {}, Building {}", number, rng.random_range(1..=50)),
                city: CITIES[i % CITIES.len()].to_string(),
                total_orders: rng.random_range(1..=50),
                total_spent: rng.random_range(500..10_500),
                status: if rng.random::<f64>() > 0.1 {
                    CustomerStatus::Active
                } else {
                    CustomerStatus::Inactive
                },
                join_date: random_date(rng, 2023),
            }
        })
        .collect()
}

pub fn generate_orders<R: Rng>(rng: &mut R, count: usize) -> Vec<Order> {
    (0..count)
        .map(|i| {
            let product_count = rng.random_range(1..=3);
            let products = (0..product_count)
                .map(|_| PRODUCT_NAMES[rng.random_range(0..PRODUCT_NAMES.len())].to_string())
                .collect();
            Order {
                id: format!("ORD-{:03}", i + 1),
                customer_name: STORE_NAMES[i % STORE_NAMES.len()].to_string(),
                customer_email: format!("customer{}@example.com", (i % 10) + 1),
                products,
                total_amount: rng.random_range(100..5_100),
                status: OrderStatus::ALL[rng.random_range(0..OrderStatus::ALL.len())],
                order_date: random_date(rng, 2024),
                shipping_address: format!("Uzbekistan, Tashkent, Street {}", i + 1),
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn catalog_product(
    id: &str,
    name: &str,
    category: &str,
    price: f64,
    stock: u32,
    description: &str,
    sku: &str,
    supplier: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        stock,
        description: description.to_string(),
        sku: sku.to_string(),
        supplier: supplier.to_string(),
        status: ProductStatus::for_stock(stock),
    }
}

/// Five fixed catalogue items followed by generated filler.
pub fn generate_products<R: Rng>(rng: &mut R, count: usize) -> Vec<Product> {
    let mut products = vec![
        catalog_product("1", "Classic White T-Shirt", "T-Shirts", 15.99, 150, "Premium cotton white t-shirt", "TS-001", "Cotton Co."),
        catalog_product("2", "Blue Denim Jeans", "Jeans", 45.99, 8, "Classic blue denim jeans", "JN-001", "Denim Works"),
        catalog_product("3", "Summer Floral Dress", "Dresses", 35.99, 75, "Light summer dress with floral pattern", "DR-001", "Fashion Plus"),
        catalog_product("4", "Leather Jacket", "Jackets", 89.99, 2, "Genuine leather jacket", "JK-001", "Leather Craft"),
        catalog_product("5", "Cotton Polo Shirt", "T-Shirts", 25.99, 120, "Premium cotton polo shirt", "PS-001", "Cotton Co."),
    ];
    products.truncate(count);

    for i in products.len()..count {
        let number = i + 1;
        let stock = rng.random_range(1..=200);
        products.push(Product {
            id: number.to_string(),
            name: format!("Product {}", number),
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            price: f64::from(rng.random_range(10..110u32)),
            stock,
            description: format!("Description for product {}", number),
            sku: format!("SKU-{:03}", number),
            supplier: SUPPLIERS[i % SUPPLIERS.len()].to_string(),
            status: if rng.random::<f64>() > 0.8 {
                ProductStatus::LowStock
            } else {
                ProductStatus::Active
            },
        });
    }
    products
}
