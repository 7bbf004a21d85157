use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::TEST_CLASSIFIER_MODEL;

pub fn classification_path() -> String {
    format!("/models/{}", TEST_CLASSIFIER_MODEL)
}

pub const COMPLETION_PATH: &str = "/chat/completions";

/// Answers every classification request with `status` and `body`.
pub async fn mount_classification(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(classification_path()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers the first `times` classification requests with `status`, then
/// falls through to whatever is mounted next.
pub async fn mount_classification_failures(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(classification_path()))
        .respond_with(ResponseTemplate::new(status).set_body_string("model is loading"))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

pub async fn mount_completion(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(COMPLETION_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Fails the test on drop if the classification endpoint was ever hit.
pub async fn expect_no_classification(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(classification_path()))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Fails the test on drop if the completion endpoint was ever hit.
pub async fn expect_no_completion(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(COMPLETION_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
