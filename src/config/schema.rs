//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the image relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, endpoint path).
    pub listener: ListenerConfig,

    /// Upstream generation API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path of the generation endpoint.
    pub path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            path: "/api/generate-image".to_string(),
        }
    }
}

/// Upstream generative API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the generation API, without a trailing path.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Inline API key. Takes precedence over `api_key_env` when set.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model used when the caller does not name one.
    pub default_model: String,

    /// Honor HTTP(S)_PROXY environment variables for upstream calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            default_model: "gemini-2.0-flash-exp".to_string(),
            use_system_proxy: true,
        }
    }
}

impl UpstreamConfig {
    /// Resolve the credential from config, falling back to the environment.
    ///
    /// Values are trimmed; a blank source is treated as absent and does not
    /// shadow the next one.
    pub fn resolve_api_key(&self) -> Option<String> {
        fn non_blank(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        self.api_key
            .as_deref()
            .and_then(non_blank)
            .or_else(|| std::env::var(&self.api_key_env).ok().as_deref().and_then(non_blank))
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Upstream request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            // Image generation is slow
            request_secs: 120,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 20 * 1024 * 1024, // 20MB, inline images are large
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.listener.path, "/api/generate-image");
        assert_eq!(config.upstream.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.timeouts.request_secs, 120);
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            default_model = "gemini-2.5-flash-image"

            [security]
            max_body_size = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.default_model, "gemini-2.5-flash-image");
        assert_eq!(config.upstream.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.security.max_body_size, 1024);
    }

    #[test]
    fn inline_key_wins_and_blank_key_is_absent() {
        let mut upstream = UpstreamConfig {
            api_key_env: "IMAGE_RELAY_TEST_UNSET_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(upstream.resolve_api_key(), None);

        upstream.api_key = Some("   ".to_string());
        assert_eq!(upstream.resolve_api_key(), None);

        upstream.api_key = Some(" secret\n".to_string());
        assert_eq!(upstream.resolve_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn blank_inline_key_falls_back_to_environment() {
        std::env::set_var("IMAGE_RELAY_TEST_FALLBACK_KEY", "real-key\n");
        let mut upstream = UpstreamConfig {
            api_key_env: "IMAGE_RELAY_TEST_FALLBACK_KEY".to_string(),
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(upstream.resolve_api_key().as_deref(), Some("real-key"));

        upstream.api_key = Some("  ".to_string());
        assert_eq!(upstream.resolve_api_key().as_deref(), Some("real-key"));

        upstream.api_key = Some("inline".to_string());
        assert_eq!(upstream.resolve_api_key().as_deref(), Some("inline"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let mut config = RelayConfig::default();
        config.upstream.api_key = Some("secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
