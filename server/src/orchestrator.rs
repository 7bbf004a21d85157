//! Request orchestration: validate, call one adapter, shape the result.

use errors::ServiceError;
use mn_core::prompt::{PromptKind, build_prompt};
use mn_core::traits::{CompletionService, EmotionClassifier};
use mn_core::types::{
    AnalyzeResponse, HealthStatus, InsightSummary, Suggestion, SuggestionResponse,
    TaskSuggestionRequest, TextRequest,
};
use std::sync::Arc;

use crate::telemetry::record_operation;

/// Sequences the model adapters for each endpoint.
///
/// Both adapters are shared read-only across concurrent requests. Each
/// operation makes at most one logical outbound call.
#[derive(Clone)]
pub struct Orchestrator {
    classifier: Arc<dyn EmotionClassifier>,
    completion: Arc<dyn CompletionService>,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            classifier,
            completion,
        }
    }

    /// Classifies the emotion of `request.text`.
    ///
    /// Blank text is rejected before the classifier is called. The text is
    /// forwarded untrimmed.
    #[tracing::instrument(skip_all, fields(text_len = request.text.len()))]
    pub async fn analyze(&self, request: &TextRequest) -> Result<AnalyzeResponse, ServiceError> {
        record_operation("analyze", async {
            request.ensure_valid()?;
            let emotion = self.classifier.classify(&request.text).await?;
            tracing::debug!(label = %emotion.label, score = emotion.score, "Classified text");
            Ok::<_, ServiceError>(AnalyzeResponse { emotion })
        })
        .await
    }

    #[tracing::instrument(
        skip_all,
        fields(thoughts = request.thoughts.len(), tasks = request.tasks.len())
    )]
    pub async fn suggest_task(
        &self,
        request: &TaskSuggestionRequest,
    ) -> Result<SuggestionResponse, ServiceError> {
        record_operation("suggest_task", async {
            let prompt =
                build_prompt(PromptKind::TaskSuggestion, &request.thoughts, &request.tasks);
            let text = self.completion.complete(&prompt).await?;
            Ok::<_, ServiceError>(SuggestionResponse::from(Suggestion::from(text)))
        })
        .await
    }

    #[tracing::instrument(
        skip_all,
        fields(thoughts = request.thoughts.len(), tasks = request.tasks.len())
    )]
    pub async fn insight_summary(
        &self,
        request: &TaskSuggestionRequest,
    ) -> Result<InsightSummary, ServiceError> {
        record_operation("insight_summary", async {
            let prompt =
                build_prompt(PromptKind::InsightSummary, &request.thoughts, &request.tasks);
            let text = self.completion.complete(&prompt).await?;
            Ok::<_, ServiceError>(InsightSummary::from(text))
        })
        .await
    }

    /// Fixed liveness record. Never touches the adapters.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy()
    }
}
