//! # Configuration Validation
//!
//! Validates configuration with the `validator` crate and enforces the
//! startup requirements that field-level rules cannot express.

use crate::config::Config;
use errors::ConfigurationError;
use validator::Validate;

/// Name of the credential the completion service requires.
pub const COMPLETION_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Validate configuration before the service starts.
///
/// ## Validation Rules
/// - all field-level `validator` rules (ranges, URLs, logging level)
/// - `completion.api_key` must be present
/// - `resilience.initial_delay_ms` must not exceed `resilience.max_delay_ms`
/// - every attempt plus every backoff delay must fit inside
///   `server.request_timeout_seconds`
pub fn validate(config: &Config) -> Result<(), ConfigurationError> {
    config
        .validate()
        .map_err(|errors| ConfigurationError::InvalidValue {
            field: errors
                .errors()
                .keys()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            reason: errors.to_string(),
        })?;

    if config.resilience.initial_delay_ms > config.resilience.max_delay_ms {
        return Err(ConfigurationError::InvalidValue {
            field: "resilience.initial_delay_ms".to_string(),
            reason: format!(
                "{} exceeds max_delay_ms {}",
                config.resilience.initial_delay_ms, config.resilience.max_delay_ms
            ),
        });
    }

    let worst_case = worst_case_upstream_ms(config);
    let request_budget = config.server.request_timeout_seconds.saturating_mul(1000);
    if worst_case > request_budget {
        return Err(ConfigurationError::InvalidValue {
            field: "server.request_timeout_seconds".to_string(),
            reason: format!(
                "retries may take {worst_case}ms, over the {request_budget}ms request budget"
            ),
        });
    }

    match config.completion.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ConfigurationError::MissingCredential {
            name: COMPLETION_API_KEY_VAR.to_string(),
        }),
    }
}

/// Longest time one upstream call may take: every attempt runs to its
/// timeout and every backoff delay is at its cap.
fn worst_case_upstream_ms(config: &Config) -> u64 {
    let resilience = &config.resilience;
    let retries = u64::from(resilience.max_retries);
    (retries + 1)
        .saturating_mul(resilience.call_timeout_ms)
        .saturating_add(retries.saturating_mul(resilience.max_delay_ms))
}
