//! Server configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `till.toml` in the working directory (optional)
//! 3. `TILL_*` environment variables, e.g. `TILL_HTTP_PORT=9000`
//!
//! `main` loads `.env` into the environment before any of this runs.

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use till_db::DbConfig;

/// Signing key used when none is configured. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "till-dev-secret-change-in-production";

const IN_MEMORY_DATABASE: &str = ":memory:";

/// API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind.
    pub http_host: String,

    /// HTTP port.
    pub http_port: u16,

    /// SQLite file, or `:memory:`.
    pub database_path: String,

    /// Pool size for file-backed databases.
    pub db_max_connections: u32,

    /// HS256 key for staff tokens.
    pub jwt_secret: String,

    /// Upper bound for any single request.
    pub request_timeout_secs: u64,

    /// Attempts for a checkout commit that keeps losing stock races.
    pub checkout_max_attempts: u32,
}

impl AppConfig {
    /// Loads configuration from `till.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("till")
    }

    /// Loads configuration using `file_stem` as the optional config file.
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8080)?
            .set_default("database_path", "till.db")?
            .set_default("db_max_connections", 5)?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("request_timeout_secs", 30)?
            .set_default("checkout_max_attempts", 3)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("TILL").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue("jwt_secret".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("request_timeout_secs".to_string()));
        }
        if self.checkout_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("checkout_max_attempts".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Pool settings for the configured database.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == IN_MEMORY_DATABASE {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            http_host: "127.0.0.1".to_string(),
            http_port: 9000,
            database_path: IN_MEMORY_DATABASE.to_string(),
            db_max_connections: 5,
            jwt_secret: "secret".to_string(),
            request_timeout_secs: 30,
            checkout_max_attempts: 3,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from("does-not-exist").unwrap();
        assert!(!config.jwt_secret.is_empty());
        assert!(config.checkout_max_attempts >= 1);
    }

    #[test]
    fn test_validation_rejects_empty_secret() {
        let mut config = sample();
        config.jwt_secret = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(ref key)) if key == "jwt_secret"
        ));
    }

    #[test]
    fn test_bind_address_and_db_config() {
        let config = sample();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.db_config().max_connections, 1);

        let mut file_backed = sample();
        file_backed.database_path = "/tmp/till.db".to_string();
        file_backed.db_max_connections = 8;
        assert_eq!(file_backed.db_config().max_connections, 8);
    }
}
