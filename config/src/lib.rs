//! # Configuration System
//!
//! Centralized configuration management for the Mindnote service.
//!
//! This crate provides:
//! - Configuration structures for the server and both model adapters
//! - Environment variable loading (12-factor app principles) as sparse
//!   overrides
//! - Configuration file loading (TOML/YAML)
//! - Configuration precedence (CLI > env > file > defaults)
//! - Configuration validation, including the required completion credential

pub mod config;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validation;

pub use config::{
    ClassifierConfig, CompletionConfig, Config, ObservabilityConfig, ResilienceConfig,
    ServerConfig,
};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::load_from_env;
pub use precedence::{
    ClassifierOverrides, CompletionOverrides, ConfigOverrides, ObservabilityOverrides,
    ResilienceOverrides, ServerOverrides, merge_configs,
};
pub use validation::{COMPLETION_API_KEY_VAR, validate};
