//! Server configuration

use crate::error::ApiError;
use std::path::PathBuf;
use tracing::info;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Replacement for the built-in site catalog
    pub site_catalog: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/waste_monitor".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            max_connections: 10,
            site_catalog: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        let defaults = Self::default();

        let max_connections = match std::env::var("WM_MAX_CONNECTIONS") {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                ApiError::Config(format!("invalid WM_MAX_CONNECTIONS value {raw:?}: {e}"))
            })?,
            Err(_) => defaults.max_connections,
        };

        Ok(Self {
            database_url: var_or("DATABASE_URL", defaults.database_url),
            bind_addr: var_or("WM_BIND_ADDR", defaults.bind_addr),
            max_connections,
            site_catalog: std::env::var("WM_SITE_CATALOG").ok().map(PathBuf::from),
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default
    })
}
