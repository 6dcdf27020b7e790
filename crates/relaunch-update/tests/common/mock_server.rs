//! Mock raw-file host
//!
//! Serves `/version.txt` and `/{artifact}` the way a raw-file host serves a
//! release branch.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `version` as `/version.txt`
pub async fn mock_version(server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path("/version.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", version)))
        .mount(server)
        .await;
}

/// Fail `/version.txt` with `status`
pub async fn mock_version_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/version.txt"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve `content` as `/{artifact}`
pub async fn mock_artifact(server: &MockServer, artifact: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", artifact)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

/// Fail `/{artifact}` with 500
pub async fn mock_failing_artifact(server: &MockServer, artifact: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", artifact)))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}
