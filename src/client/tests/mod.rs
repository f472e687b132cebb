//! Test utilities and common test fixtures for client modules

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::client::{
    api::BentoClient,
    config::ClientConfig,
    error::{BentoError, Result},
    transport::{HttpRequest, HttpResponse, Transport},
};


pub const PUBLISHABLE_KEY: &str = "pk_test_0123456789abcdefghijkl";
pub const SECRET_KEY: &str = "sk_test_0123456789abcdefghijkl";
pub const SITE_UUID: &str = "site_0123456789abcdefghijklmnop";

/// Valid credentials pointed at `base_url`
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(PUBLISHABLE_KEY, SECRET_KEY, SITE_UUID).with_base_url(base_url)
}

/// Transport that answers every request with the same canned response
/// and keeps a copy of what it was sent
#[derive(Debug, Clone)]
pub struct StubTransport {
    status: u16,
    body: String,
    pub requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl StubTransport {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body: body.to_string(), requests: Arc::default() }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), requests: Arc::default() }
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse::new(self.status, self.body.clone()))
    }
}

/// Transport that fails the test if it is ever called
#[derive(Debug)]
pub struct PanicTransport;

#[async_trait]
impl Transport for PanicTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        panic!("transport must not be called, got {} {}", request.method, request.url);
    }
}

/// Transport that always fails with the given message
#[derive(Debug)]
pub struct FailingTransport(pub &'static str);

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
        Err(BentoError::transport(self.0))
    }
}

/// Client wired to a stub answering `status` with `body`
pub fn stub_client(status: u16, body: serde_json::Value) -> (BentoClient, StubTransport) {
    let stub = StubTransport::new(status, body);
    let client = BentoClient::with_transport(test_config("https://app.bentonow.com/api/v1"), stub.clone())
        .unwrap();
    (client, stub)
}

/// Client that panics if any request reaches the transport
pub fn offline_client() -> BentoClient {
    BentoClient::with_transport(test_config("https://app.bentonow.com/api/v1"), PanicTransport).unwrap()
}

/// JSON representation of a subscriber
pub fn sample_subscriber_json() -> serde_json::Value {
    json!({
        "id": "123",
        "type": "visitors",
        "attributes": {
            "uuid": "a1b2c3",
            "email": "test@example.com",
            "fields": { "plan": "pro" },
            "cached_tag_ids": ["1", "2"],
            "unsubscribed_at": null,
            "navigation_url": "https://app.bentonow.com/visitors/123"
        }
    })
}

/// JSON representation of a tag
pub fn sample_tag_json() -> serde_json::Value {
    json!({
        "id": "1",
        "type": "tags",
        "attributes": {
            "name": "customers",
            "created_at": "2024-01-01T00:00:00Z",
            "discarded_at": null,
            "site_id": 42
        }
    })
}

/// JSON representation of a custom field
pub fn sample_field_json() -> serde_json::Value {
    json!({
        "id": "9",
        "type": "visitors-fields",
        "attributes": {
            "name": "Plan",
            "key": "plan",
            "whitelisted": true,
            "created_at": "2024-01-01T00:00:00Z"
        }
    })
}

/// JSON representation of a broadcast
pub fn sample_broadcast_json() -> serde_json::Value {
    json!({
        "name": "Spring launch",
        "subject": "Something new",
        "content": "<p>Hello</p>",
        "type": "plain",
        "from": { "name": "Team", "email": "team@example.com" },
        "inclusive_tags": "customers",
        "batch_size_per_hour": 1000
    })
}

/// Bento API error response
pub fn bento_error_response(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a client pointing to this mock server
    pub fn client(&self) -> BentoClient {
        BentoClient::new(test_config(&self.base_url())).unwrap()
    }
}

#[allow(clippy::module_inception)]
mod tests {
    use super::*;
    use crate::domain::{FieldData, SubscriberData, TagData};

    #[test]
    fn test_fixture_credentials_satisfy_strict_policy() {
        let mut config = test_config("https://app.bentonow.com/api/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_json_decodes() {
        let subscriber: SubscriberData = serde_json::from_value(sample_subscriber_json()).unwrap();
        assert_eq!(subscriber.id.as_str(), "123");

        let tag: TagData = serde_json::from_value(sample_tag_json()).unwrap();
        assert_eq!(tag.attributes.name, "customers");

        let field: FieldData = serde_json::from_value(sample_field_json()).unwrap();
        assert_eq!(field.attributes.whitelisted, Some(true));
    }
}
