//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.samples_per_image == 0 {
            return Err(ConfigError::ValidationError(
                "query.samples_per_image must be > 0".into(),
            ));
        }
        if self.query.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "query.max_tokens must be > 0".into(),
            ));
        }
        if self.throttle.max_parallel_requests == 0 {
            return Err(ConfigError::ValidationError(
                "throttle.max_parallel_requests must be > 0".into(),
            ));
        }
        if self.throttle.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "throttle.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.scoring.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "scoring.model must not be empty".into(),
            ));
        }
        if self.curation.ledger_file.is_empty() || self.curation.labels_file.is_empty() {
            return Err(ConfigError::ValidationError(
                "curation file names must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_samples() {
        let mut config = Config::default();
        config.query.samples_per_image = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("samples_per_image"));
    }

    #[test]
    fn test_validate_rejects_zero_parallel_requests() {
        let mut config = Config::default();
        config.throttle.max_parallel_requests = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_parallel_requests"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.throttle.request_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_scoring_model() {
        let mut config = Config::default();
        config.scoring.model = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scoring.model"));
    }
}
