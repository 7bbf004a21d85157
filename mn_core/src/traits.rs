//! Seams between the orchestrator and the two external model services.
//!
//! Implementations are constructed once at startup and shared read-only
//! across concurrent requests, so every method takes `&self`.

use async_trait::async_trait;
use errors::UpstreamError;

use crate::prompt::Prompt;
use crate::types::{CompletionText, EmotionResult};

/// Pre-trained text-classification model configured for top-1 output.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifies `text` and returns its single best-scoring label.
    async fn classify(&self, text: &str) -> Result<EmotionResult, UpstreamError>;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;
}

/// Generative chat-completion service reached with a single user message.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends the prompt and returns the text of the first completion choice.
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionText, UpstreamError>;

    /// Identifier of the completion model requests are sent to.
    fn model_id(&self) -> &str;
}
