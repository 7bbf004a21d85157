use config::Config;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU32, Ordering};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub const TEST_CLASSIFIER_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";
pub const TEST_COMPLETION_MODEL: &str = "gpt-4.1";
pub const TEST_API_KEY: &str = "sk-test-key";

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// Configuration pointing both adapters at local mock servers, with
/// millisecond backoff so retry tests stay fast.
pub fn test_config(classifier_uri: &str, completion_uri: &str) -> Config {
    let mut config = Config::default();
    config.classifier.endpoint = format!("{}/models", classifier_uri);
    config.classifier.model = TEST_CLASSIFIER_MODEL.to_string();
    config.classifier.verify_on_startup = false;
    config.completion.api_base = completion_uri.to_string();
    config.completion.model = TEST_COMPLETION_MODEL.to_string();
    config.completion.api_key = Some(TEST_API_KEY.to_string());
    config.resilience.max_retries = 2;
    config.resilience.initial_delay_ms = 1;
    config.resilience.max_delay_ms = 5;
    config.resilience.call_timeout_ms = 2_000;
    config.observability.metrics_enabled = false;
    config
}

/// Classification result in the nested per-input shape.
pub fn classification_body(label: &str, score: f64) -> Value {
    json!([[{ "label": label, "score": score }]])
}

/// Classification result in the flat single-input shape.
pub fn flat_classification_body(label: &str, score: f64) -> Value {
    json!([{ "label": label, "score": score }])
}

pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": unique_id("chatcmpl"),
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": TEST_COMPLETION_MODEL,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
    })
}

pub fn empty_chat_completion_body() -> Value {
    json!({
        "id": unique_id("chatcmpl"),
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": TEST_COMPLETION_MODEL,
        "choices": []
    })
}

pub fn openai_error_body(message: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "param": null,
            "code": "invalid_api_key"
        }
    })
}
