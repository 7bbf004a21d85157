use async_trait::async_trait;
use errors::UpstreamError;
use mn_core::prompt::Prompt;
use mn_core::traits::CompletionService;
use mn_core::types::CompletionText;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_RESPONSE: &str = "Take a short walk before starting the next task.";

/// In-memory completion service for tests. Records every prompt it
/// receives.
pub struct MockCompletionService {
    response: String,
    failure: Option<UpstreamError>,
    prompts: Arc<RwLock<Vec<Prompt>>>,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self::with_response(DEFAULT_RESPONSE)
    }

    pub fn with_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Service whose every call fails with `error`.
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub async fn prompts(&self) -> Vec<Prompt> {
        self.prompts.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.read().await.len()
    }
}

impl Default for MockCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionText, UpstreamError> {
        self.prompts.write().await.push(prompt.clone());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        CompletionText::new(&self.response).ok_or_else(|| UpstreamError::EmptyResult {
            service: "completion".to_string(),
        })
    }

    fn model_id(&self) -> &str {
        "mock-completion"
    }
}
