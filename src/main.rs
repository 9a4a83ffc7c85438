use apparel_console::ambient::{start_ambient_generator, AmbientTier, RandomEventSource};
use apparel_console::console::{ExportFormat, ExportRequest, OrderStatus};
use apparel_console::dropdown::DropdownView;
use apparel_console::state::{AppState, Config};
use futures::StreamExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn event_source(config: &Config, offset: u64) -> RandomEventSource {
    match config.ambient_seed {
        Some(seed) => RandomEventSource::seeded(seed.wrapping_add(offset)),
        None => RandomEventSource::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,apparel_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    tracing::debug!("Loaded configuration: {:?}", config);

    let state = AppState::new(config.clone());

    // Log every bus event as JSON
    let mut events = state.notifications.subscribe();
    let logger = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(target: "apparel_console::bus", "{}", json),
                    Err(e) => tracing::warn!("Failed to encode bus event: {}", e),
                },
                Err(e) => tracing::warn!("Bus subscriber lagged: {}", e),
            }
        }
    });

    let mut generators = Vec::new();
    if config.ambient_enabled {
        generators.push(start_ambient_generator(
            &state.notifications,
            event_source(&config, 0),
            vec![AmbientTier::activity()],
        ));
        generators.push(start_ambient_generator(
            &state.notifications,
            event_source(&config, 1),
            AmbientTier::dashboard(),
        ));
        tracing::info!("Started {} ambient generators", generators.len());
    }

    // A short walk through the console so the bell has something to show
    if let Some(order) = state.order_service.list(Some("ORD-001")).first() {
        state.order_service.update_status(&order.id, OrderStatus::Shipped)?;
    }
    let export = state.export_service.export(
        &state.product_service.list(Some("jeans")),
        ExportRequest::new("products", ExportFormat::Csv).with_fields(["name", "stock", "price"]),
    )?;
    tracing::info!("Exported {} ({} bytes)", export.file_name, export.content.len());

    let actionable = state
        .notifications
        .notifications()
        .into_iter()
        .find(|n| n.action.is_some());
    if let Some(notification) = actionable {
        state.notifications.trigger_action(notification.id);
    }

    let view = DropdownView::build(&state.notifications, config.dropdown_limit, chrono::Utc::now());
    tracing::info!(
        "Dropdown: {} rows, badge {:?}, {}",
        view.rows.len(),
        view.badge,
        view.overflow_label().unwrap_or_default()
    );

    tracing::info!("Notification center running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down");
    for generator in generators {
        generator.cancel();
    }
    state.shutdown();
    logger.abort();

    Ok(())
}
