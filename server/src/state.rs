//! Application state shared by every handler.

use config::Config;
use errors::ConfigurationError;
use inference::{HuggingFaceClassifier, OpenAICompletionService, RetryPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use mn_core::traits::{CompletionService, EmotionClassifier};
use std::sync::Arc;

use crate::orchestrator::Orchestrator;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub config: Arc<Config>,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds both model adapters from configuration.
    ///
    /// With `classifier.verify_on_startup` set, the classification model must
    /// answer a probe before this returns.
    pub async fn new(config: Config) -> Result<Self, ConfigurationError> {
        let policy = RetryPolicy::from(&config.resilience);

        let classifier = HuggingFaceClassifier::new(&config.classifier, policy.clone())?;
        if config.classifier.verify_on_startup {
            classifier.verify().await?;
        } else {
            tracing::info!(model = %config.classifier.model, "Skipping classification model probe");
        }

        let completion = OpenAICompletionService::new(&config.completion, policy)?;
        tracing::info!(
            classifier = classifier.model_id(),
            completion = completion.model_id(),
            "Model adapters initialized"
        );

        Ok(Self::with_adapters(
            config,
            Arc::new(classifier),
            Arc::new(completion),
        ))
    }

    /// Creates application state around existing adapters (useful for testing).
    #[must_use]
    pub fn with_adapters(
        config: Config,
        classifier: Arc<dyn EmotionClassifier>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(classifier, completion),
            config: Arc::new(config),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
