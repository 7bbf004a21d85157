use async_trait::async_trait;
use errors::UpstreamError;
use mn_core::traits::EmotionClassifier;
use mn_core::types::EmotionResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

const DEFAULT_KEY: &str = "DEFAULT";

const LEXICON: &[(&str, &str)] = &[
    ("thrilled", "joy"),
    ("happy", "joy"),
    ("great", "joy"),
    ("sad", "sadness"),
    ("lonely", "sadness"),
    ("angry", "anger"),
    ("furious", "anger"),
    ("scared", "fear"),
    ("worried", "fear"),
    ("surprised", "surprise"),
    ("disgusted", "disgust"),
];

/// In-memory classifier for tests. Answers from a keyword lexicon unless a
/// response was registered for the exact text or as the default.
pub struct MockEmotionClassifier {
    responses: Arc<RwLock<HashMap<String, EmotionResult>>>,
    failure: Option<UpstreamError>,
    calls: AtomicUsize,
}

impl MockEmotionClassifier {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Classifier whose every call fails with `error`.
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub async fn add_response(&self, text: &str, result: EmotionResult) {
        let mut responses = self.responses.write().await;
        responses.insert(text.to_string(), result);
    }

    pub async fn set_response(&self, result: EmotionResult) {
        let mut responses = self.responses.write().await;
        responses.insert(DEFAULT_KEY.to_string(), result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn from_lexicon(text: &str) -> EmotionResult {
        let lowered = text.to_lowercase();
        let (label, score) = LEXICON
            .iter()
            .find(|(word, _)| lowered.contains(word))
            .map_or(("neutral", 0.6), |(_, label)| (*label, 0.9));
        EmotionResult {
            label: label.to_string(),
            score,
        }
    }
}

impl Default for MockEmotionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmotionClassifier for MockEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<EmotionResult, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let responses = self.responses.read().await;
        if let Some(result) = responses.get(text) {
            Ok(result.clone())
        } else if let Some(result) = responses.get(DEFAULT_KEY) {
            Ok(result.clone())
        } else {
            Ok(Self::from_lexicon(text))
        }
    }

    fn model_id(&self) -> &str {
        "mock-emotion-classifier"
    }
}
