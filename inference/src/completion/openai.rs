use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use config::{COMPLETION_API_KEY_VAR, CompletionConfig};
use errors::{ConfigurationError, UpstreamError};
use mn_core::prompt::Prompt;
use mn_core::traits::CompletionService;
use mn_core::types::CompletionText;

use crate::resilience::{RetryPolicy, call_with_retry};

const SERVICE: &str = "completion";

/// Error code the completion API uses for throttled requests.
const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

/// Completion service backed by an OpenAI-compatible chat API.
pub struct OpenAICompletionService {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
    policy: RetryPolicy,
}

impl OpenAICompletionService {
    /// Fails when no API key is configured; the service must not start
    /// without one.
    pub fn new(config: &CompletionConfig, policy: RetryPolicy) -> Result<Self, ConfigurationError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigurationError::MissingCredential {
                name: COMPLETION_API_KEY_VAR.to_string(),
            })?;

        let model = config.model.trim();
        if model.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "completion.model".to_string(),
                reason: "model identifier is empty".to_string(),
            });
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.to_string())
            .with_api_base(config.api_base.trim_end_matches('/'));

        // Retries belong to `call_with_retry`; the client's own backoff is
        // turned off so one attempt is one HTTP request.
        let no_backoff = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Ok(Self {
            client: async_openai::Client::with_config(openai_config).with_backoff(no_backoff),
            model: model.to_string(),
            policy,
        })
    }

    async fn complete_once(&self, prompt: &Prompt) -> Result<CompletionText, UpstreamError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.text())
                .build()
                .map_err(map_openai_error)?
                .into()])
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .and_then(CompletionText::new)
            .ok_or_else(|| UpstreamError::EmptyResult {
                service: SERVICE.to_string(),
            })
    }
}

#[async_trait]
impl CompletionService for OpenAICompletionService {
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionText, UpstreamError> {
        tracing::debug!(model = %self.model, kind = %prompt.kind(), "Requesting completion");
        call_with_retry(&self.policy, SERVICE, || self.complete_once(prompt)).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn map_openai_error(err: OpenAIError) -> UpstreamError {
    match &err {
        OpenAIError::Reqwest(e) => UpstreamError::Transport {
            service: SERVICE.to_string(),
            reason: e.to_string(),
        },
        // Server errors arrive as a bare message with no type, code or param.
        OpenAIError::ApiError(api)
            if api.r#type.is_none() && api.code.is_none() && api.param.is_none() =>
        {
            UpstreamError::Unavailable {
                service: SERVICE.to_string(),
                status: None,
                reason: api.message.clone(),
            }
        }
        OpenAIError::ApiError(api) if api.code.as_deref() == Some(RATE_LIMIT_CODE) => {
            UpstreamError::Unavailable {
                service: SERVICE.to_string(),
                status: Some(429),
                reason: api.message.clone(),
            }
        }
        OpenAIError::ApiError(api) => UpstreamError::Rejected {
            service: SERVICE.to_string(),
            status: None,
            reason: api.message.clone(),
        },
        OpenAIError::JSONDeserialize(..) => UpstreamError::MalformedResponse {
            service: SERVICE.to_string(),
            reason: err.to_string(),
        },
        _ => UpstreamError::Rejected {
            service: SERVICE.to_string(),
            status: None,
            reason: err.to_string(),
        },
    }
}
