//! # Mindnote Server
//!
//! HTTP front end over two external models: an emotion classifier and a
//! chat-completion service.
//!
//! ## Endpoints
//!
//! - `POST /analyze` - Top emotion label and score for a piece of text
//! - `POST /suggest-task` - One suggested next task from thoughts and tasks
//! - `POST /insight-summary` - One paragraph of insight, as a bare JSON string
//! - `GET /health` - Fixed liveness payload
//! - `GET /metrics` - Prometheus metrics endpoint (404 when disabled)

pub mod cli;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use error::{ApiError, ServerError};
pub use orchestrator::Orchestrator;
pub use server::MindnoteServer;
pub use state::AppState;
