//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for every href the API emits.
    pub public_base_url: String,
    pub database: Option<DatabaseConfig>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080);

        let public_base_url = var("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{host}:{port}"));

        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: var("DB_MIN_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        Self {
            host,
            port,
            public_base_url,
            database,
            telemetry: TelemetryConfig::from_vars(&var),
        }
    }
}
