use std::{net::SocketAddr, str::FromStr, time::Duration};

use livemap_core::constants::DEFAULT_CLEANUP_INTERVAL_SECS;
use livemap_core::dashboard::DashboardSettings;
use livemap_core::orders::PlatformTimeZone;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Initial map view sent to dashboard pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [39.8283, -98.5795],
            zoom: 4,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub map: MapView,
    pub dashboard: DashboardSettings,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = var_or(name, default);
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: name,
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn parse_center(name: &'static str, default: [f64; 2]) -> Result<[f64; 2], ConfigError> {
    let Ok(value) = std::env::var(name) else {
        return Ok(default);
    };
    let invalid = |reason: &str| ConfigError::Invalid {
        var: name,
        value: value.clone(),
        reason: reason.to_string(),
    };
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid("expected `<lat>,<lng>`"))?;
    match parts.as_slice() {
        [lat, lng] if lat.abs() <= 90.0 && lng.abs() <= 180.0 => Ok([*lat, *lng]),
        [_, _] => Err(invalid("coordinates out of range")),
        _ => Err(invalid("expected `<lat>,<lng>`")),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = parse_var("LIVEMAP_LISTEN_ADDR", "0.0.0.0:8080")?;
        let db_path = var_or("LIVEMAP_DB_PATH", "./db/orders.db");
        let cors_allow = var_or("LIVEMAP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_var("LIVEMAP_REQUEST_TIMEOUT_MS", "30000")?;
        let static_dir = var_or("LIVEMAP_STATIC_DIR", "static");

        let defaults = MapView::default();
        let map = MapView {
            center: parse_center("LIVEMAP_MAP_CENTER", defaults.center)?,
            zoom: parse_var("LIVEMAP_MAP_ZOOM", "4")?,
            ..defaults
        };

        let cleanup_secs: u64 = parse_var(
            "LIVEMAP_CLEANUP_INTERVAL_SECS",
            &DEFAULT_CLEANUP_INTERVAL_SECS.to_string(),
        )?;
        if cleanup_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "LIVEMAP_CLEANUP_INTERVAL_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let dashboard = DashboardSettings {
            cleanup_interval: Duration::from_secs(cleanup_secs),
            resync_on_lag: parse_var("LIVEMAP_RESYNC_ON_LAG", "false")?,
            time_zone: parse_var::<PlatformTimeZone>("LIVEMAP_OLO_TIMEZONE", "")?,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            map,
            dashboard,
        })
    }
}
