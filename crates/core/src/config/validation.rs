//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `limit` is 0 or exceeds 500
    /// - `max_pages` is 0 or exceeds 50
    /// - `fetch_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `nav_timeout_ms` is less than 1s or exceeds 5 minutes
    /// - `settle_ms` exceeds 10s
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::Invalid { field: "limit".into(), reason: "must be greater than 0".into() });
        }
        if self.limit > 500 {
            return Err(ConfigError::Invalid { field: "limit".into(), reason: "must not exceed 500".into() });
        }

        if self.max_pages == 0 {
            return Err(ConfigError::Invalid { field: "max_pages".into(), reason: "must be greater than 0".into() });
        }
        if self.max_pages > 50 {
            return Err(ConfigError::Invalid { field: "max_pages".into(), reason: "must not exceed 50".into() });
        }

        if self.fetch_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.fetch_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.nav_timeout_ms < 1_000 {
            return Err(ConfigError::Invalid {
                field: "nav_timeout_ms".into(),
                reason: "must be at least 1000ms".into(),
            });
        }
        if self.nav_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "nav_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.settle_ms > 10_000 {
            return Err(ConfigError::Invalid { field: "settle_ms".into(), reason: "must not exceed 10s".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.model_enabled && !cfg!(feature = "model") {
            tracing::warn!("model_enabled is set but sentio was built without the `model` feature");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_limit_zero() {
        let config = AppConfig { limit: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "limit"));
    }

    #[test]
    fn test_validate_limit_exceeds_cap() {
        let config = AppConfig { limit: 501, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "limit"));
    }

    #[test]
    fn test_validate_max_pages_zero() {
        let config = AppConfig { max_pages: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_pages"));
    }

    #[test]
    fn test_validate_fetch_timeout_too_small() {
        let config = AppConfig { fetch_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_nav_timeout_too_small() {
        let config = AppConfig { nav_timeout_ms: 500, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "nav_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            limit: 1,
            max_pages: 50,
            fetch_timeout_ms: 100,
            nav_timeout_ms: 1_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
