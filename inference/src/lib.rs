//! # Mindnote Inference
//!
//! Adapters for the two external model services the orchestrator calls:
//! - [`classifier`]: emotion classification over the Hugging Face
//!   inference API
//! - [`completion`]: chat completions over an OpenAI-compatible API
//!
//! Both go through [`resilience::call_with_retry`] for bounded retries and
//! a per-attempt timeout. In-memory mocks of each live next to the real
//! adapters.

pub mod classifier;
pub mod completion;
pub mod resilience;

pub use classifier::{HuggingFaceClassifier, MockEmotionClassifier};
pub use completion::{MockCompletionService, OpenAICompletionService};
pub use resilience::{RetryPolicy, call_with_retry};
