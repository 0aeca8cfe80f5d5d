use crate::config::types::{
    BackoffStrategy, Config, OutputConfig, RegistryConfig, RetryConfig, TargetConfig,
};
use crate::region::SchoolFilter;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_registry_config(&config.registry)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    validate_target_config(&config.targets)?;
    Ok(())
}

/// Validates registry endpoints and client settings
fn validate_registry_config(config: &RegistryConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("profile-base-url", &config.profile_base_url)?;

    if config.semester_id.is_empty() || !config.semester_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "semester-id must be a non-empty string of digits, got '{}'",
            config.semester_id
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry policy settings
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts == Some(0) {
        return Err(ConfigError::Validation(
            "max-attempts must be >= 1 when set".to_string(),
        ));
    }

    if config.strategy == BackoffStrategy::Exponential && config.backoff_ms > config.max_backoff_ms
    {
        return Err(ConfigError::Validation(format!(
            "backoff-ms ({}) cannot exceed max-backoff-ms ({})",
            config.backoff_ms, config.max_backoff_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the harvest targets
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    if config.cities.is_empty() {
        return Err(ConfigError::Validation(
            "at least one target city is required".to_string(),
        ));
    }

    // An empty fragment would match every city in the country
    if config.cities.iter().any(|c| c.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "target city names cannot be blank".to_string(),
        ));
    }

    if config.education_forms.is_empty() {
        return Err(ConfigError::Validation(
            "education-forms cannot be empty".to_string(),
        ));
    }

    if config.ownership_statuses.is_empty() {
        return Err(ConfigError::Validation(
            "ownership-statuses cannot be empty".to_string(),
        ));
    }

    SchoolFilter::from_config(config)?;

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}
