use async_trait::async_trait;
use config::ClassifierConfig;
use errors::{ConfigurationError, UpstreamError};
use mn_core::traits::EmotionClassifier;
use mn_core::types::EmotionResult;
use serde::{Deserialize, Serialize};

use crate::resilience::{RetryPolicy, call_with_retry};

const SERVICE: &str = "classifier";

/// Text classified once at startup to prove the model answers.
const PROBE_TEXT: &str = "I feel like today has the potential to be a great day!";

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
    options: ClassificationOptions,
}

#[derive(Debug, Serialize)]
struct ClassificationParameters {
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct ClassificationOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The inference API nests results per input for batched calls and
/// flattens them for single inputs; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationPayload {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationPayload {
    fn into_best(self) -> Option<LabelScore> {
        let candidates: Vec<LabelScore> = match self {
            Self::Nested(rows) => rows.into_iter().flatten().collect(),
            Self::Flat(row) => row,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Emotion classifier backed by a Hugging Face text-classification model
/// served over the inference HTTP API.
///
/// The model is always asked for its single best label (`top_k = 1`).
pub struct HuggingFaceClassifier {
    client: reqwest::Client,
    url: String,
    model: String,
    api_token: Option<String>,
    policy: RetryPolicy,
}

impl HuggingFaceClassifier {
    pub fn new(config: &ClassifierConfig, policy: RetryPolicy) -> Result<Self, ConfigurationError> {
        let endpoint = config.endpoint.trim_end_matches('/');
        reqwest::Url::parse(endpoint).map_err(|e| ConfigurationError::InvalidValue {
            field: "classifier.endpoint".to_string(),
            reason: e.to_string(),
        })?;

        let model = config.model.trim();
        if model.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "classifier.model".to_string(),
                reason: "model identifier is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder().build().map_err(|e| {
            ConfigurationError::DependencyUnavailable {
                dependency: SERVICE.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            client,
            url: format!("{endpoint}/{model}"),
            model: model.to_string(),
            api_token: config.api_token.clone(),
            policy,
        })
    }

    /// Classifies a fixed probe text. Failure means the model cannot serve
    /// requests and startup must stop.
    pub async fn verify(&self) -> Result<(), ConfigurationError> {
        let result = self
            .classify(PROBE_TEXT)
            .await
            .map_err(|e| ConfigurationError::DependencyUnavailable {
                dependency: format!("classification model {}", self.model),
                reason: e.to_string(),
            })?;

        tracing::info!(
            model = %self.model,
            label = %result.label,
            score = result.score,
            "Classification model verified"
        );
        Ok(())
    }

    async fn classify_once(&self, text: &str) -> Result<EmotionResult, UpstreamError> {
        let request = ClassificationRequest {
            inputs: text,
            parameters: ClassificationParameters { top_k: 1 },
            options: ClassificationOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let reason = truncate(&body);
            let status = status.as_u16();
            return Err(
                if status == 429 || status == 503 || (500..600).contains(&status) {
                    UpstreamError::Unavailable {
                        service: SERVICE.to_string(),
                        status: Some(status),
                        reason,
                    }
                } else {
                    UpstreamError::Rejected {
                        service: SERVICE.to_string(),
                        status: Some(status),
                        reason,
                    }
                },
            );
        }

        let payload: ClassificationPayload =
            serde_json::from_str(&body).map_err(|e| UpstreamError::MalformedResponse {
                service: SERVICE.to_string(),
                reason: e.to_string(),
            })?;

        let best = payload.into_best().ok_or_else(|| UpstreamError::EmptyResult {
            service: SERVICE.to_string(),
        })?;

        EmotionResult::new(best.label.clone(), best.score).ok_or_else(|| {
            UpstreamError::MalformedResponse {
                service: SERVICE.to_string(),
                reason: format!("invalid label/score pair ({:?}, {})", best.label, best.score),
            }
        })
    }
}

#[async_trait]
impl EmotionClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<EmotionResult, UpstreamError> {
        call_with_retry(&self.policy, SERVICE, || self.classify_once(text)).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        service: SERVICE.to_string(),
        reason: err.to_string(),
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
