//! Bearer token configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::JwtConfig;

/// Minimum HS256 secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    pub jwt_secret: SecretString,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl AuthConfig {
    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
        }
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("auth.jwt_secret"));
        }
        if environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::WeakJwtSecret(MIN_PRODUCTION_SECRET_BYTES));
        }
        if self.issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("auth.issuer"));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::MissingRequired("auth.audience"));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "live-classroom".to_string()
}

fn default_audience() -> String {
    "live-classroom".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(
            config("  ").validate(Environment::Development),
            Err(ValidationError::MissingRequired("auth.jwt_secret"))
        );
    }

    #[test]
    fn short_secret_only_allowed_outside_production() {
        assert!(config("dev-secret").validate(Environment::Development).is_ok());
        assert_eq!(
            config("dev-secret").validate(Environment::Production),
            Err(ValidationError::WeakJwtSecret(MIN_PRODUCTION_SECRET_BYTES))
        );
        assert!(config(&"x".repeat(48)).validate(Environment::Production).is_ok());
    }

    #[test]
    fn debug_output_hides_secret() {
        let printed = format!("{:?}", config("super-secret-value"));
        assert!(!printed.contains("super-secret-value"));
    }
}
