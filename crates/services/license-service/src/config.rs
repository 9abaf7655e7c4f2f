//! License service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, ServiceConfig};

/// License service configuration.
#[derive(Debug, Clone, Default)]
pub struct LicenseServiceConfig {
    /// HTTP server settings
    pub server: ServiceConfig,
    /// Database pool settings
    pub database: DatabaseConfig,
}

impl LicenseServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let server_defaults = ServiceConfig::default();
        let db_defaults = DatabaseConfig::default();

        Self {
            server: ServiceConfig {
                service_name: server_defaults.service_name,
                host: env::var("HOST").unwrap_or(server_defaults.host),
                port: parse_var("PORT", server_defaults.port),
                request_timeout_secs: parse_var(
                    "REQUEST_TIMEOUT_SECS",
                    server_defaults.request_timeout_secs,
                ),
            },
            database: DatabaseConfig {
                url: database_url().unwrap_or(db_defaults.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", db_defaults.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", db_defaults.min_connections),
                connect_attempts: parse_var(
                    "DATABASE_CONNECT_ATTEMPTS",
                    db_defaults.connect_attempts,
                ),
                retry_delay_secs: parse_var(
                    "DATABASE_RETRY_DELAY_SECS",
                    db_defaults.retry_delay_secs,
                ),
            },
        }
    }
}

/// `DATABASE_URL`, or one assembled from the `POSTGRES_*` variables.
fn database_url() -> Option<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Some(url);
    }

    let user = env::var("POSTGRES_USERNAME").ok()?;
    let password = env::var("POSTGRES_PASSWORD").ok()?;
    let name = env::var("POSTGRES_NAME").ok()?;
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());

    Some(build_postgres_url(&user, &password, &host, &port, &name))
}

fn build_postgres_url(user: &str, password: &str, host: &str, port: &str, name: &str) -> String {
    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
