//! Application configuration.
//!
//! Loaded from environment variables with the `LIVE_CLASSROOM` prefix and
//! `__` between nested keys, after an optional `.env` file:
//!
//! ```text
//! LIVE_CLASSROOM__SERVER__PORT=8080
//! LIVE_CLASSROOM__DATABASE__URL=postgres://classroom@localhost/classroom
//! LIVE_CLASSROOM__AUTH__JWT_SECRET=...
//! LIVE_CLASSROOM__RECONCILIATION__INTERVAL_SECS=900
//! ```
//!
//! ```no_run
//! use live_classroom::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod reconciliation;
mod security;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use reconciliation::ReconciliationConfig;
pub use security::SecurityConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

pub const ENV_PREFIX: &str = "LIVE_CLASSROOM";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub reconciliation: ReconciliationConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when a required key is missing or a value
    /// does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Semantic checks that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(self.server.environment)?;
        self.reconciliation.validate()?;
        self.security.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
