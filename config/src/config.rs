//! # Configuration Structures
//!
//! This module defines all configuration structures for the Mindnote
//! service.
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation
//! - Default to values that run against the public model endpoints

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure for the Mindnote service.
///
/// ## Fields
/// - `server`: HTTP listener, cross-origin policy and request budget
/// - `classifier`: emotion classification model endpoint
/// - `completion`: chat-completion service endpoint and credential
/// - `resilience`: retry and timeout policy for outbound model calls
/// - `observability`: logging level and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    #[validate(nested)]
    pub completion: CompletionConfig,

    #[serde(default)]
    #[validate(nested)]
    pub resilience: ResilienceConfig,

    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
///
/// ## Fields
/// - `host`: Bind address (default: "0.0.0.0")
/// - `port`: Bind port (default: 8000)
/// - `cors_allowed_origins`: Allowed origins, `"*"` for any (default: `["*"]`)
/// - `request_timeout_seconds`: Budget for a whole inbound request
///   (default: 120)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    #[serde(default = "default_server_port")]
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[serde(default = "default_cors_allowed_origins")]
    #[validate(length(min = 1))]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_request_timeout_seconds")]
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_seconds: u64,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_request_timeout_seconds() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cors_allowed_origins: default_cors_allowed_origins(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

/// Emotion classification model configuration.
///
/// The model is always queried for its single best label; top-1 truncation
/// is not configurable per request.
///
/// ## Fields
/// - `endpoint`: Base URL of the inference API
/// - `model`: Model identifier appended to `endpoint`
/// - `api_token`: Bearer token for the inference API (optional)
/// - `verify_on_startup`: Classify a probe text before serving (default: true)
#[derive(Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_classifier_endpoint")]
    #[validate(url)]
    pub endpoint: String,

    #[serde(default = "default_classifier_model")]
    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    #[serde(default = "default_verify_on_startup")]
    pub verify_on_startup: bool,
}

fn default_classifier_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_classifier_model() -> String {
    "j-hartmann/emotion-english-distilroberta-base".to_string()
}

fn default_verify_on_startup() -> bool {
    true
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            model: default_classifier_model(),
            api_token: None,
            verify_on_startup: default_verify_on_startup(),
        }
    }
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("verify_on_startup", &self.verify_on_startup)
            .finish()
    }
}

/// Chat-completion service configuration.
///
/// ## Fields
/// - `api_base`: Base URL of the OpenAI-compatible API
/// - `model`: Completion model identifier (default: "gpt-4.1")
/// - `api_key`: Secret credential, required before serving
#[derive(Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_api_base")]
    #[validate(url)]
    pub api_base: String,

    #[serde(default = "default_completion_model")]
    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_completion_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_completion_model() -> String {
    "gpt-4.1".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: default_completion_api_base(),
            model: default_completion_model(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Retry and timeout policy applied to every outbound model call.
///
/// ## Fields
/// - `max_retries`: Extra attempts after the first failure (default: 2)
/// - `initial_delay_ms`: First backoff delay (default: 200)
/// - `max_delay_ms`: Cap on any single backoff delay (default: 2000)
/// - `call_timeout_ms`: Budget for a single attempt (default: 30000)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ResilienceConfig {
    #[serde(default = "default_max_retries")]
    #[validate(range(max = 10))]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    #[validate(range(min = 1, max = 60000))]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    #[validate(range(min = 1, max = 300000))]
    pub max_delay_ms: u64,

    #[serde(default = "default_call_timeout_ms")]
    #[validate(range(min = 1, max = 600000))]
    pub call_timeout_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_call_timeout_ms() -> u64 {
    30000
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

/// Observability configuration.
///
/// ## Fields
/// - `metrics_enabled`: Record metrics and serve `/metrics` (default: true)
/// - `logging_level`: Log level when `RUST_LOG` is unset (default: "info")
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_observability_metrics_enabled")]
    pub metrics_enabled: bool,

    #[serde(default = "default_observability_logging_level")]
    #[validate(custom(function = "validate_logging_level"))]
    pub logging_level: String,
}

fn default_observability_metrics_enabled() -> bool {
    true
}

fn default_observability_logging_level() -> String {
    "info".to_string()
}

fn validate_logging_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid logging level")),
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_observability_metrics_enabled(),
            logging_level: default_observability_logging_level(),
        }
    }
}
