//! HTTP request handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use errors::{ServiceError, ValidationError};
use mn_core::types::{
    AnalyzeResponse, HealthStatus, InsightSummary, SuggestionResponse, TaskSuggestionRequest,
    TextRequest,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::telemetry::record_failure;

/// Turns an unreadable body into a validation failure so it shares the
/// error envelope with every other failure.
fn read_body<T>(
    operation: &'static str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let err = ServiceError::from(ValidationError::MalformedBody {
                reason: rejection.body_text(),
            });
            record_failure(operation, &err);
            Err(ApiError(err))
        }
    }
}

/// POST /analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = read_body("analyze", payload)?;
    let response = state.orchestrator.analyze(&request).await?;
    Ok(Json(response))
}

/// POST /suggest-task
pub async fn suggest_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskSuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let request = read_body("suggest_task", payload)?;
    let response = state.orchestrator.suggest_task(&request).await?;
    Ok(Json(response))
}

/// POST /insight-summary
///
/// The body is the paragraph itself, as a JSON string.
pub async fn insight_summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskSuggestionRequest>, JsonRejection>,
) -> Result<Json<InsightSummary>, ApiError> {
    let request = read_body("insight_summary", payload)?;
    let summary = state.orchestrator.insight_summary(&request).await?;
    Ok(Json(summary))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.orchestrator.health())
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when metrics are disabled.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
