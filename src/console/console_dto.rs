use validator::Validate;

// Customer DTOs
#[derive(Debug, Clone, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

// Product DTOs
#[derive(Debug, Clone, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub stock: u32,
    pub description: String,
    #[validate(length(min = 1))]
    pub sku: String,
    pub supplier: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub supplier: Option<String>,
}
