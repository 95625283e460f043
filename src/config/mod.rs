//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables carry the `STOREPLEX` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use storeplex::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! let table = config.entitlements.build_table().expect("Invalid tier catalog");
//! ```

mod database;
mod directory;
mod entitlements;
mod error;
mod side_effects;
mod telemetry;

pub use database::DatabaseConfig;
pub use directory::DirectoryConfig;
pub use entitlements::{CatalogFile, EntitlementConfig, FeatureEntry, TierEntry};
pub use error::{ConfigError, ValidationError};
pub use side_effects::SideEffectConfig;
pub use telemetry::{init_tracing, LogFormat, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration.
///
/// Every section is optional. Without `database` the process runs on
/// in-memory adapters; without `directory` status changes are not mirrored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Set to `true` for production-only checks (HTTPS directory).
    #[serde(default)]
    pub production: bool,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub directory: Option<DirectoryConfig>,

    #[serde(default)]
    pub entitlements: EntitlementConfig,

    #[serde(default)]
    pub side_effects: SideEffectConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `STOREPLEX` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// # Environment Variable Format
    ///
    /// - `STOREPLEX__DATABASE__URL=...` -> `database.url`
    /// - `STOREPLEX__SIDE_EFFECTS__QUEUE_CAPACITY=512` -> `side_effects.queue_capacity`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STOREPLEX")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every present section.
    ///
    /// The tier catalog is validated separately when the table is built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(directory) = &self.directory {
            directory.validate(self.production)?;
        }
        self.side_effects.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "STOREPLEX__DATABASE__URL",
        "STOREPLEX__DIRECTORY__BASE_URL",
        "STOREPLEX__DIRECTORY__API_KEY",
        "STOREPLEX__SIDE_EFFECTS__QUEUE_CAPACITY",
        "STOREPLEX__TELEMETRY__FORMAT",
        "STOREPLEX__PRODUCTION",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_gives_in_memory_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert!(config.database.is_none());
        assert!(config.directory.is_none());
        assert_eq!(config.side_effects.queue_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_sections_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("STOREPLEX__DATABASE__URL", "postgresql://test@localhost/storeplex");
        env::set_var("STOREPLEX__DIRECTORY__BASE_URL", "https://dir.example.com");
        env::set_var("STOREPLEX__DIRECTORY__API_KEY", "dir-key");
        env::set_var("STOREPLEX__SIDE_EFFECTS__QUEUE_CAPACITY", "32");
        env::set_var("STOREPLEX__TELEMETRY__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgresql://test@localhost/storeplex")
        );
        assert_eq!(config.side_effects.queue_capacity, 32);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_rejects_plain_http_directory() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("STOREPLEX__PRODUCTION", "true");
        env::set_var("STOREPLEX__DIRECTORY__BASE_URL", "http://dir.internal");
        env::set_var("STOREPLEX__DIRECTORY__API_KEY", "dir-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::DirectoryMustBeHttps)));
    }
}
