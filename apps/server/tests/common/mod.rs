#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
};
use livemap_core::dashboard::DashboardSettings;
use livemap_core::orders::{OloTimestamp, Order, OrderLookup};
use livemap_server::{build_state, config::Config, config::MapView, AppState};
use livemap_storage_sqlite::{create_pool, orders::OrderReader};
use tempfile::TempDir;

pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub reader: OrderReader,
    _dir: TempDir,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path: dir.path().join("orders.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        static_dir: dir.path().to_string_lossy().to_string(),
        map: MapView::default(),
        dashboard: DashboardSettings::default(),
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let state = build_state(&config).await.unwrap();
    let router = livemap_server::api::app_router(state.clone(), &config);
    let reader = OrderReader::new(create_pool(&state.db_path).unwrap());
    TestApp {
        router,
        state,
        reader,
        _dir: dir,
    }
}

impl TestApp {
    /// Every stored row, oldest first.
    pub async fn stored_orders(&self) -> Vec<Order> {
        let epoch: OloTimestamp = "19700101 00:00".parse().unwrap();
        self.reader.list_active_candidates(epoch).await.unwrap()
    }
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
