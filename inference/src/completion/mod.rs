//! Chat-completion adapters.

pub mod mock;
pub mod openai;

pub use mock::MockCompletionService;
pub use openai::OpenAICompletionService;
