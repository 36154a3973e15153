//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CAREPATH_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use carepath::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Fallback window: {} days", config.detection.fallback_window_days);
//! ```

mod database;
mod detection;
mod error;
mod reference;

pub use database::DatabaseConfig;
pub use detection::DetectionConfig;
pub use error::{ConfigError, ValidationError};
pub use reference::ReferenceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Carepath engine.
/// Load using [`AppConfig::load()`] which reads from environment variables.
///
/// Every section has sensible defaults: a process with no environment at all
/// runs against the built-in seed data with the standard detection windows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    ///
    /// The URL may be left empty: seed-backed in-memory deployments
    /// never open a connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Reference data configuration (seed file overrides)
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Stage detection tuning (fallback window, assumed cycle length)
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAREPATH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CAREPATH__DATABASE__URL=...` -> `database.url = ...`
    /// - `CAREPATH__DETECTION__FALLBACK_WINDOW_DAYS=10` -> `detection.fallback_window_days = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAREPATH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Database URL format and pool constraints (when a URL is set)
    /// - Detection window and assumed cycle length ranges
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // An empty URL means this deployment runs on the in-memory adapters.
        if !self.database.url.is_empty() {
            self.database.validate()?;
        }
        self.detection.validate()?;
        Ok(())
    }
}
