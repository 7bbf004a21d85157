//! Shared test fixtures for the Mindnote workspace.
//!
//! Provides:
//! - Canned upstream bodies for the classification and completion APIs
//! - `wiremock` helpers that mount those bodies on a [`MockServer`]
//! - A [`Config`](config::Config) pointed at mock servers with fast retries
//!
//! [`MockServer`]: wiremock::MockServer

mod fixtures;
mod upstream;

pub use fixtures::*;
pub use upstream::*;
