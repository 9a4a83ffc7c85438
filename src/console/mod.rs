// Declare submodules
pub mod bulk_delete;
pub mod console_dto;
pub mod console_models;
pub mod customer_service;
pub mod export;
pub mod export_service;
pub mod mock_data;
pub mod order_service;
pub mod product_service;
pub mod record_store;

// Re-export public items
pub use bulk_delete::bulk_delete;
pub use console_dto::{NewCustomer, NewProduct, ProductUpdate};
pub use console_models::{
    Customer, CustomerStatus, Order, OrderStatus, Product, ProductStatus, Record, LOW_STOCK_THRESHOLD,
};
pub use customer_service::CustomerService;
pub use export::{export_csv, export_json, export_json_lines, select_fields, to_rows, Row};
pub use export_service::{available_fields, ExportFormat, ExportRequest, ExportService, ExportedFile};
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use record_store::{RecordStore, RestoreRecord};
