use errors::ValidationError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TextRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank_text"))
    } else {
        Ok(())
    }
}

impl TextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Checks that the text is non-empty once surrounding whitespace is
    /// trimmed.
    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        self.validate().map_err(|_| ValidationError::EmptyText)
    }
}

/// Top-1 emotion label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub label: String,
    pub score: f64,
}

impl EmotionResult {
    /// Returns `None` when the label is blank or the score is not a finite
    /// value within `[0, 1]`.
    pub fn new(label: impl Into<String>, score: f64) -> Option<Self> {
        let label = label.into();
        if label.trim().is_empty() || !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return None;
        }
        Some(Self { label, score })
    }
}

/// Body returned by `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub emotion: EmotionResult,
}

/// Body of `POST /suggest-task` and `POST /insight-summary`.
///
/// Order matters: it is the bullet order in the rendered prompt. Duplicates
/// are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestionRequest {
    #[serde(default)]
    pub thoughts: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl TaskSuggestionRequest {
    pub fn new(thoughts: Vec<String>, tasks: Vec<String>) -> Self {
        Self { thoughts, tasks }
    }
}

/// Non-empty text produced by the completion service, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionText(String);

impl CompletionText {
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A single recommended action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    text: String,
}

impl Suggestion {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<CompletionText> for Suggestion {
    fn from(value: CompletionText) -> Self {
        Self {
            text: value.into_inner(),
        }
    }
}

/// Body returned by `POST /suggest-task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggested_task: String,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(value: Suggestion) -> Self {
        Self {
            suggested_task: value.text,
        }
    }
}

/// One reflective paragraph addressed to the author.
///
/// Serializes as a bare JSON string: `POST /insight-summary` returns the
/// paragraph itself as the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightSummary {
    text: String,
}

impl InsightSummary {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<CompletionText> for InsightSummary {
    fn from(value: CompletionText) -> Self {
        Self {
            text: value.into_inner(),
        }
    }
}

/// Fixed liveness record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
