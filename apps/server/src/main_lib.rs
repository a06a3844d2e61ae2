use std::sync::Arc;

use crate::{
    config::{Config, MapView},
    domain_events::WebDomainEventSink,
    events::EventBus,
};
use livemap_core::{
    dashboard::{Clock, DashboardSettings, SystemClock},
    events::DomainEventSink,
    orders::{OrderLookup, OrderService, OrderServiceTrait},
};
use livemap_storage_sqlite::{
    db::{self, write_actor},
    orders::OrderRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub order_service: Arc<dyn OrderServiceTrait>,
    /// Read-only storage handed to dashboard sessions.
    pub order_lookup: Arc<dyn OrderLookup>,
    pub clock: Arc<dyn Clock>,
    pub event_bus: EventBus,
    pub dashboard: DashboardSettings,
    pub map: MapView,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("LIVEMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let event_bus = EventBus::new(256);
    let domain_event_sink: Arc<dyn DomainEventSink> =
        Arc::new(WebDomainEventSink::new(event_bus.clone()));

    let order_repository = Arc::new(OrderRepository::new(pool.clone(), writer));
    let order_lookup: Arc<dyn OrderLookup> = Arc::new(order_repository.reader());
    let order_service: Arc<dyn OrderServiceTrait> =
        Arc::new(OrderService::new(order_repository, domain_event_sink));

    tracing::info!(
        "Olo timestamps read in {} time; dashboard cleanup every {:?}",
        config.dashboard.time_zone,
        config.dashboard.cleanup_interval
    );

    Ok(Arc::new(AppState {
        order_service,
        order_lookup,
        clock: Arc::new(SystemClock),
        event_bus,
        dashboard: config.dashboard.clone(),
        map: config.map.clone(),
        db_path,
    }))
}
