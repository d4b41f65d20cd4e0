//! Password hashing cost configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::security::Argon2Cost;

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_memory_kib")]
    pub argon2_memory_kib: u32,

    #[serde(default = "default_iterations")]
    pub argon2_iterations: u32,

    #[serde(default = "default_parallelism")]
    pub argon2_parallelism: u32,
}

impl SecurityConfig {
    pub fn argon2_cost(&self) -> Argon2Cost {
        Argon2Cost {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(8_192..=1_048_576).contains(&self.argon2_memory_kib) {
            return Err(ValidationError::InvalidArgon2Parameter("argon2_memory_kib"));
        }
        if !(1..=10).contains(&self.argon2_iterations) {
            return Err(ValidationError::InvalidArgon2Parameter("argon2_iterations"));
        }
        if !(1..=16).contains(&self.argon2_parallelism) {
            return Err(ValidationError::InvalidArgon2Parameter("argon2_parallelism"));
        }
        Ok(())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: default_memory_kib(),
            argon2_iterations: default_iterations(),
            argon2_parallelism: default_parallelism(),
        }
    }
}

fn default_memory_kib() -> u32 {
    Argon2Cost::default().memory_kib
}

fn default_iterations() -> u32 {
    Argon2Cost::default().iterations
}

fn default_parallelism() -> u32 {
    Argon2Cost::default().parallelism
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SecurityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.argon2_cost(), Argon2Cost::default());
    }

    #[test]
    fn out_of_range_parameters_are_named() {
        let config = SecurityConfig {
            argon2_iterations: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidArgon2Parameter("argon2_iterations"))
        );

        let config = SecurityConfig {
            argon2_memory_kib: 64,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidArgon2Parameter("argon2_memory_kib"))
        );
    }
}
