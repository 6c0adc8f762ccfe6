//! Configuration module for the employee manager gateway.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application name used when none is configured. It prefixes alert headers
/// and alert message keys.
pub const DEFAULT_APP_NAME: &str = "employeeManagerGatewayApp";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Application name carried in `X-<app>-alert` headers
    pub app_name: String,
    /// Remote gateway the admin pages read from; the local database when unset
    pub api_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("EMGR_DB_PATH")
            .unwrap_or_else(|_| "./data/gateway.sqlite".to_string())
            .into();

        let bind_addr = env::var("EMGR_BIND_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Ignoring invalid EMGR_BIND_ADDR {:?}: {}", raw, e);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let log_level = env::var("EMGR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let app_name = env::var("EMGR_APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());

        let api_base_url = env::var("EMGR_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            db_path,
            bind_addr,
            log_level,
            app_name,
            api_base_url,
        }
    }
}
