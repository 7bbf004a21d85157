//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `MN_*`: Mindnote settings
//! - `OPENAI_API_KEY`: completion service credential
//! - `HF_API_TOKEN`: classification inference API token

use crate::precedence::{
    ClassifierOverrides, CompletionOverrides, ConfigOverrides, ObservabilityOverrides,
    ResilienceOverrides, ServerOverrides,
};
use errors::ConfigurationError;
use std::env;

/// Load configuration overrides from environment variables.
///
/// Only variables that are set produce a value; everything else stays
/// `None` so lower-priority sources keep theirs. A variable that is set but
/// cannot be parsed is a [`ConfigurationError`].
///
/// ## Environment Variables
/// ### Server
/// - `MN_HOST`: Bind address (default: "0.0.0.0")
/// - `MN_PORT`: Bind port (default: 8000)
/// - `MN_CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: "*")
/// - `MN_REQUEST_TIMEOUT_SECONDS`: Inbound request budget (default: 120)
///
/// ### Classifier
/// - `MN_CLASSIFIER_ENDPOINT`: Inference API base URL
/// - `MN_CLASSIFIER_MODEL`: Model identifier
/// - `HF_API_TOKEN`: Inference API token (optional)
/// - `MN_CLASSIFIER_VERIFY_ON_STARTUP`: Probe the model before serving
///   (true/false)
///
/// ### Completion
/// - `MN_COMPLETION_API_BASE`: OpenAI-compatible API base URL
/// - `MN_COMPLETION_MODEL`: Completion model identifier
/// - `OPENAI_API_KEY`: API key (required before serving)
///
/// ### Resilience
/// - `MN_RETRY_MAX_RETRIES`, `MN_RETRY_INITIAL_DELAY_MS`,
///   `MN_RETRY_MAX_DELAY_MS`, `MN_CALL_TIMEOUT_MS`
///
/// ### Observability
/// - `MN_METRICS_ENABLED`: Record and expose metrics (true/false)
/// - `MN_LOG_LEVEL`: trace/debug/info/warn/error
pub fn load_from_env() -> Result<ConfigOverrides, ConfigurationError> {
    Ok(ConfigOverrides {
        server: ServerOverrides {
            host: non_empty_env("MN_HOST"),
            port: parse_env("MN_PORT")?,
            cors_allowed_origins: env::var("MN_CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_list(&v)),
            request_timeout_seconds: parse_env("MN_REQUEST_TIMEOUT_SECONDS")?,
        },
        classifier: ClassifierOverrides {
            endpoint: non_empty_env("MN_CLASSIFIER_ENDPOINT"),
            model: non_empty_env("MN_CLASSIFIER_MODEL"),
            api_token: non_empty_env("HF_API_TOKEN"),
            verify_on_startup: parse_env("MN_CLASSIFIER_VERIFY_ON_STARTUP")?,
        },
        completion: CompletionOverrides {
            api_base: non_empty_env("MN_COMPLETION_API_BASE"),
            model: non_empty_env("MN_COMPLETION_MODEL"),
            api_key: non_empty_env("OPENAI_API_KEY"),
        },
        resilience: ResilienceOverrides {
            max_retries: parse_env("MN_RETRY_MAX_RETRIES")?,
            initial_delay_ms: parse_env("MN_RETRY_INITIAL_DELAY_MS")?,
            max_delay_ms: parse_env("MN_RETRY_MAX_DELAY_MS")?,
            call_timeout_ms: parse_env("MN_CALL_TIMEOUT_MS")?,
        },
        observability: ObservabilityOverrides {
            metrics_enabled: parse_env("MN_METRICS_ENABLED")?,
            logging_level: non_empty_env("MN_LOG_LEVEL"),
        },
    })
}

/// Parses `key` if it is set. Unset is `Ok(None)`; set but unparseable is an
/// error naming the variable.
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigurationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigurationError::InvalidValue {
                field: key.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "MN_HOST",
        "MN_PORT",
        "MN_CORS_ALLOWED_ORIGINS",
        "MN_REQUEST_TIMEOUT_SECONDS",
        "MN_CLASSIFIER_ENDPOINT",
        "MN_CLASSIFIER_MODEL",
        "HF_API_TOKEN",
        "MN_CLASSIFIER_VERIFY_ON_STARTUP",
        "MN_COMPLETION_API_BASE",
        "MN_COMPLETION_MODEL",
        "OPENAI_API_KEY",
        "MN_RETRY_MAX_RETRIES",
        "MN_RETRY_INITIAL_DELAY_MS",
        "MN_RETRY_MAX_DELAY_MS",
        "MN_CALL_TIMEOUT_MS",
        "MN_METRICS_ENABLED",
        "MN_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_defaults() {
        clear_env();

        let overrides = load_from_env().unwrap();
        assert_eq!(overrides, ConfigOverrides::default());
    }

    #[test]
    #[serial]
    fn test_load_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("MN_HOST", "127.0.0.1");
            env::set_var("MN_PORT", "9100");
            env::set_var("MN_CORS_ALLOWED_ORIGINS", "http://localhost:5173, https://app.example");
            env::set_var("MN_CLASSIFIER_MODEL", "custom/emotion");
            env::set_var("MN_CLASSIFIER_VERIFY_ON_STARTUP", "false");
            env::set_var("OPENAI_API_KEY", "sk-test");
            env::set_var("MN_RETRY_MAX_RETRIES", "0");
            env::set_var("MN_LOG_LEVEL", "debug");
        }

        let overrides = load_from_env().unwrap();
        clear_env();

        assert_eq!(overrides.server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(overrides.server.port, Some(9100));
        assert_eq!(
            overrides.server.cors_allowed_origins,
            Some(vec![
                "http://localhost:5173".to_string(),
                "https://app.example".to_string()
            ])
        );
        assert_eq!(overrides.classifier.model.as_deref(), Some("custom/emotion"));
        assert_eq!(overrides.classifier.verify_on_startup, Some(false));
        assert_eq!(overrides.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(overrides.resilience.max_retries, Some(0));
        assert_eq!(overrides.observability.logging_level.as_deref(), Some("debug"));
        assert_eq!(overrides.resilience.call_timeout_ms, None);
    }

    #[test]
    #[serial]
    fn test_unparseable_value_is_configuration_error() {
        clear_env();
        unsafe {
            env::set_var("MN_PORT", "eighty");
        }

        let result = load_from_env();
        clear_env();

        match result {
            Err(ConfigurationError::InvalidValue { field, .. }) => assert_eq!(field, "MN_PORT"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_blank_api_key_treated_as_missing() {
        clear_env();
        unsafe {
            env::set_var("OPENAI_API_KEY", "   ");
        }

        let overrides = load_from_env().unwrap();
        clear_env();

        assert!(overrides.completion.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_default_valued_env_overrides_file() {
        clear_env();
        unsafe {
            env::set_var("MN_PORT", "8000");
            env::set_var("MN_METRICS_ENABLED", "true");
        }

        let overrides = load_from_env().unwrap();
        clear_env();

        let mut config = Config::default();
        config.server.port = 9000;
        config.observability.metrics_enabled = false;
        overrides.apply_to(&mut config);

        assert_eq!(config.server.port, 8000);
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
