//! # Configuration Precedence
//!
//! Merges configuration from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! The configuration file is read as a complete [`Config`] with defaults
//! filled in. Environment variables and CLI flags are sparse: they arrive as
//! [`ConfigOverrides`], where `Some` marks a value the source actually set.

use crate::config::Config;

/// Values set explicitly by one configuration source.
///
/// A field left `None` keeps whatever a lower-priority source provided. A
/// field set to `Some` wins even when it equals the built-in default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub server: ServerOverrides,
    pub classifier: ClassifierOverrides,
    pub completion: CompletionOverrides,
    pub resilience: ResilienceOverrides,
    pub observability: ObservabilityOverrides,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Clone, Default, PartialEq)]
pub struct ClassifierOverrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_token: Option<String>,
    pub verify_on_startup: Option<bool>,
}

impl std::fmt::Debug for ClassifierOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierOverrides")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("verify_on_startup", &self.verify_on_startup)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct CompletionOverrides {
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for CompletionOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionOverrides")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResilienceOverrides {
    pub max_retries: Option<u32>,
    pub initial_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub call_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservabilityOverrides {
    pub metrics_enabled: Option<bool>,
    pub logging_level: Option<String>,
}

impl ConfigOverrides {
    /// Writes every `Some` field into `config` and returns the names of the
    /// fields that changed value.
    pub fn apply_to(self, config: &mut Config) -> Vec<&'static str> {
        let mut changes = Vec::new();

        let server = self.server;
        let target = &mut config.server;
        apply(&mut target.host, server.host, "server.host", &mut changes);
        apply(&mut target.port, server.port, "server.port", &mut changes);
        apply(
            &mut target.cors_allowed_origins,
            server.cors_allowed_origins,
            "server.cors_allowed_origins",
            &mut changes,
        );
        apply(
            &mut target.request_timeout_seconds,
            server.request_timeout_seconds,
            "server.request_timeout_seconds",
            &mut changes,
        );

        let classifier = self.classifier;
        let target = &mut config.classifier;
        apply(
            &mut target.endpoint,
            classifier.endpoint,
            "classifier.endpoint",
            &mut changes,
        );
        apply(&mut target.model, classifier.model, "classifier.model", &mut changes);
        apply_secret(
            &mut target.api_token,
            classifier.api_token,
            "classifier.api_token",
            &mut changes,
        );
        apply(
            &mut target.verify_on_startup,
            classifier.verify_on_startup,
            "classifier.verify_on_startup",
            &mut changes,
        );

        let completion = self.completion;
        let target = &mut config.completion;
        apply(
            &mut target.api_base,
            completion.api_base,
            "completion.api_base",
            &mut changes,
        );
        apply(&mut target.model, completion.model, "completion.model", &mut changes);
        apply_secret(
            &mut target.api_key,
            completion.api_key,
            "completion.api_key",
            &mut changes,
        );

        let resilience = self.resilience;
        let target = &mut config.resilience;
        apply(
            &mut target.max_retries,
            resilience.max_retries,
            "resilience.max_retries",
            &mut changes,
        );
        apply(
            &mut target.initial_delay_ms,
            resilience.initial_delay_ms,
            "resilience.initial_delay_ms",
            &mut changes,
        );
        apply(
            &mut target.max_delay_ms,
            resilience.max_delay_ms,
            "resilience.max_delay_ms",
            &mut changes,
        );
        apply(
            &mut target.call_timeout_ms,
            resilience.call_timeout_ms,
            "resilience.call_timeout_ms",
            &mut changes,
        );

        let observability = self.observability;
        let target = &mut config.observability;
        apply(
            &mut target.metrics_enabled,
            observability.metrics_enabled,
            "observability.metrics_enabled",
            &mut changes,
        );
        apply(
            &mut target.logging_level,
            observability.logging_level,
            "observability.logging_level",
            &mut changes,
        );

        changes
    }
}

/// Merge configuration sources with precedence.
///
/// `file_config` is the base; pass `Config::default()` when no file was
/// given. Environment overrides are applied next and CLI overrides last.
pub fn merge_configs(
    file_config: Config,
    file_source_name: &str,
    env_overrides: ConfigOverrides,
    env_source_name: &str,
    cli_overrides: Option<ConfigOverrides>,
    cli_source_name: &str,
) -> Config {
    let mut config = file_config;
    log_changes(&Config::default(), &config, file_source_name);

    apply_with_logging(&mut config, env_overrides, env_source_name);

    if let Some(cli) = cli_overrides {
        apply_with_logging(&mut config, cli, cli_source_name);
    }

    config
}

fn apply_with_logging(config: &mut Config, overrides: ConfigOverrides, source_name: &str) {
    let changes = overrides.apply_to(config);
    if !changes.is_empty() {
        tracing::debug!(source = source_name, fields = ?changes, "Applied configuration overrides");
    }
}

fn log_changes(defaults: &Config, config: &Config, source_name: &str) {
    if defaults != config {
        tracing::debug!(source = source_name, "Loaded configuration file");
    }
}

fn apply<T: PartialEq>(
    target: &mut T,
    candidate: Option<T>,
    name: &'static str,
    changes: &mut Vec<&'static str>,
) {
    if let Some(value) = candidate {
        if value != *target {
            changes.push(name);
        }
        *target = value;
    }
}

fn apply_secret(
    target: &mut Option<String>,
    candidate: Option<String>,
    name: &'static str,
    changes: &mut Vec<&'static str>,
) {
    if candidate.is_some() {
        *target = candidate;
        changes.push(name);
    }
}
