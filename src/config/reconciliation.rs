//! Background reconciliation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Active sessions older than this are force-completed.
    #[serde(default = "default_max_active_hours")]
    pub max_active_hours: i64,
}

impl ReconciliationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 {
            return Err(ValidationError::InvalidReconcileInterval);
        }
        if self.max_active_hours <= 0 {
            return Err(ValidationError::InvalidMaxActiveHours);
        }
        Ok(())
    }
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            max_active_hours: default_max_active_hours(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    900
}

fn default_max_active_hours() -> i64 {
    crate::application::DEFAULT_MAX_ACTIVE_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_every_fifteen_minutes() {
        let config = ReconciliationConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval(), Duration::from_secs(15 * 60));
        assert_eq!(config.max_active_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        let config = ReconciliationConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidReconcileInterval));

        let config = ReconciliationConfig {
            max_active_hours: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxActiveHours));
    }
}
