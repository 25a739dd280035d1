//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Validate addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The router treats `:`/`*` prefixes and braces as captures; the relay path is a fixed route.
fn is_literal_segment(segment: &str) -> bool {
    !segment.starts_with(':') && !segment.starts_with('*') && !segment.contains(['{', '}'])
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if !config.listener.path.starts_with('/') {
        errors.push(ValidationError::new("listener.path", "must start with '/'"));
    } else if config.listener.path == "/health" {
        errors.push(ValidationError::new("listener.path", "conflicts with the health endpoint"));
    } else if let Some(segment) = config.listener.path.split('/').find(|s| !is_literal_segment(s)) {
        errors.push(ValidationError::new(
            "listener.path",
            format!("segment '{segment}' must be literal (no ':', '*', '{{' or '}}')"),
        ));
    }

    match url::Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_url", e.to_string())),
    }

    if config.upstream.default_model.trim().is_empty() {
        errors.push(ValidationError::new("upstream.default_model", "must not be empty"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}'", config.observability.log_format),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
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
    fn default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.listener.path = "generate".into();
        config.upstream.base_url = "ftp://example.com".into();
        config.timeouts.request_secs = 0;
        config.security.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "listener.path",
                "upstream.base_url",
                "timeouts.request_secs",
                "security.max_body_size",
            ]
        );
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn relay_path_cannot_shadow_health() {
        let mut config = RelayConfig::default();
        config.listener.path = "/health".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].message, "conflicts with the health endpoint");
    }

    #[test]
    fn relay_path_must_be_literal() {
        for path in ["/api/:model", "/api/*rest", "/api/{model}", "/api/{open", "/api/close}"] {
            let mut config = RelayConfig::default();
            config.listener.path = path.into();
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1, "{path}");
            assert_eq!(errors[0].field, "listener.path", "{path}");
        }

        let mut config = RelayConfig::default();
        config.listener.path = "/v1/images/generate-image".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut config = RelayConfig::default();
        config.observability.log_format = "xml".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "observability.log_format: unknown format 'xml'");
    }
}
