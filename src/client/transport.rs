//! Pluggable HTTP transport
//!
//! Requests and responses are plain data. `BentoClient` prepares an
//! [`HttpRequest`], hands it to a [`Transport`] and interprets the returned
//! [`HttpResponse`]. Swapping the transport lets tests run without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, Method, Url};

use super::error::{BentoError, Result};

/// An HTTP request described as plain data
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: HeaderMap::new(), body: None }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// An HTTP response described as plain data
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// Sends a prepared request and returns the raw response
///
/// Implementations must not interpret the status code; they only fail for
/// transport-level problems.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BentoError::Http)?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_lookup() {
        let url = Url::parse("https://example.com/x?email=a%40b.com&site_uuid=s").unwrap();
        let request = HttpRequest::new(Method::GET, url);

        assert_eq!(request.query_param("email").as_deref(), Some("a@b.com"));
        assert_eq!(request.query_param("site_uuid").as_deref(), Some("s"));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_response_success_statuses() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(10)).is_ok());
    }
}
