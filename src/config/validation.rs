use crate::config::types::{Config, CrawlerConfig, SeedConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.politeness_interval < 100 {
        return Err(ConfigError::Validation(format!(
            "politeness_interval must be >= 100ms, got {}ms",
            config.politeness_interval
        )));
    }

    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1 second, got {}",
            config.connect_timeout
        )));
    }

    if config.retry_unavailable > 10 {
        return Err(ConfigError::Validation(format!(
            "retry_unavailable must be <= 10, got {}",
            config.retry_unavailable
        )));
    }

    Ok(())
}

/// Validates the client identity
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "identity cannot be empty".to_string(),
        ));
    }

    // Must be usable verbatim as a header value
    if config
        .identity
        .chars()
        .any(|c| c.is_control() && c != '\t')
    {
        return Err(ConfigError::Validation(format!(
            "identity contains control characters: {:?}",
            config.identity
        )));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &SeedConfig) -> Result<(), ConfigError> {
    if seeds.urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &seeds.urls {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
    }

    Ok(())
}
