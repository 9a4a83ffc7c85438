use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::console::{mock_data, CustomerService, ExportService, OrderService, ProductService, RecordStore};
use crate::error::{AppError, Result};
use crate::notification::{sample_notifications, NotificationCenter};

/// The context object handed to every consumer. Built once at startup and
/// torn down with [`AppState::shutdown`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifications: NotificationCenter,
    pub customer_service: CustomerService,
    pub order_service: OrderService,
    pub product_service: ProductService,
    pub export_service: ExportService,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let notifications = NotificationCenter::new(&config);
        if config.seed_notifications {
            notifications.seed(sample_notifications(chrono::Utc::now()));
        }

        let mut rng = match config.ambient_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let customers = RecordStore::new(mock_data::generate_customers(&mut rng, 60));
        let orders = RecordStore::new(mock_data::generate_orders(&mut rng, 150));
        let products = RecordStore::new(mock_data::generate_products(&mut rng, 50));

        Self {
            customer_service: CustomerService::new(customers, notifications.clone()),
            order_service: OrderService::new(orders, notifications.clone()),
            product_service: ProductService::new(products, notifications.clone()),
            export_service: ExportService::new(notifications.clone()),
            notifications,
            config,
        }
    }

    pub fn shutdown(&self) {
        self.notifications.shutdown();
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub toast_duration_ms: u64,
    pub event_channel_capacity: usize,
    pub dropdown_limit: usize,
    pub ambient_enabled: bool,
    pub ambient_seed: Option<u64>,
    pub seed_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast_duration_ms: 5000,
            event_channel_capacity: 100,
            dropdown_limit: 10,
            ambient_enabled: true,
            ambient_seed: None,
            seed_notifications: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            toast_duration_ms: parse_var(&lookup, "TOAST_DURATION_MS", defaults.toast_duration_ms)?,
            event_channel_capacity: parse_var(
                &lookup,
                "EVENT_CHANNEL_CAPACITY",
                defaults.event_channel_capacity,
            )?,
            dropdown_limit: parse_var(&lookup, "DROPDOWN_LIMIT", defaults.dropdown_limit)?,
            ambient_enabled: parse_var(&lookup, "AMBIENT_ENABLED", defaults.ambient_enabled)?,
            ambient_seed: match lookup("AMBIENT_SEED") {
                Some(raw) => Some(parse_value("AMBIENT_SEED", &raw)?),
                None => None,
            },
            seed_notifications: parse_var(&lookup, "SEED_NOTIFICATIONS", defaults.seed_notifications)?,
        };

        if config.toast_duration_ms == 0 {
            return Err(AppError::Config("TOAST_DURATION_MS must be positive".to_string()));
        }
        if config.event_channel_capacity == 0 {
            return Err(AppError::Config("EVENT_CHANNEL_CAPACITY must be positive".to_string()));
        }
        Ok(config)
    }

    pub fn default_toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{} must be a valid value ({}): {}", name, raw, e)))
}
