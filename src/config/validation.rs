//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns every
//! violation, not just the first, so one correction pass fixes a config.

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// One semantic violation found in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    MetricsAddress(String),
}

/// Validate a config, collecting all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::RequestTimeout));
    }

    #[test]
    fn metrics_address_is_only_checked_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MetricsAddress("nope".to_string())]);
    }
}
