//! Emotion classification adapters.

pub mod huggingface;
pub mod mock;

pub use huggingface::HuggingFaceClassifier;
pub use mock::MockEmotionClassifier;
