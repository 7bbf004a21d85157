//! # Mindnote Core
//!
//! Shared types and traits for the Mindnote service.
//!
//! This crate provides:
//! - Request and response records exchanged over HTTP
//! - The adapter traits through which the orchestrator reaches the
//!   classification model and the completion service
//! - Deterministic prompt rendering for the completion service

pub mod prompt;
pub mod traits;
pub mod types;

pub use prompt::{Prompt, PromptKind, build_prompt};
pub use traits::{CompletionService, EmotionClassifier};
pub use types::{
    AnalyzeResponse, CompletionText, EmotionResult, HealthStatus, InsightSummary, Suggestion,
    SuggestionResponse, TaskSuggestionRequest, TextRequest,
};
