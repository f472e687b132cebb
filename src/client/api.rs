//! Core HTTP client for the Bento API

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use compact_str::{format_compact, CompactString};
use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Method, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    config::ClientConfig,
    context::Context,
    error::{BentoError, Result},
    transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport},
};
use crate::domain::BatchOutcome;

/// Bento API client
///
/// Cheap to clone; clones share the same transport.
#[derive(Debug, Clone)]
pub struct BentoClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    authorization: HeaderValue,
    user_agent: HeaderValue,
}

/// `{"data": ...}` wrapper used by the resource endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Bento API error response formats
#[derive(Debug, Deserialize)]
struct BentoApiError {
    error: CompactString,
}

#[derive(Debug, Deserialize)]
struct BentoApiError2 {
    message: CompactString,
}

impl BentoClient {
    /// Create a new Bento API client using the default `reqwest` transport
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::build(config, Arc::new(transport))
    }

    /// Create a client that sends through `transport`
    pub fn with_transport(mut config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        Self::build(config, Arc::new(transport))
    }

    fn build(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let credentials = STANDARD.encode(format!("{}:{}", config.publishable_key, config.secret_key));
        let mut authorization = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|_| BentoError::config("secret_key", "contains invalid header characters"))?;
        authorization.set_sensitive(true);

        let user_agent = HeaderValue::from_str(&format!("bento-rust-{}", config.site_uuid))
            .map_err(|_| BentoError::config("site_uuid", "contains invalid header characters"))?;

        Ok(Self { config, transport, authorization, user_agent })
    }

    /// Replace the transport, e.g. with a test double
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Arc::new(transport);
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Authenticate `request` and send it through the transport
    ///
    /// Fails with [`BentoError::Cancelled`] or [`BentoError::DeadlineExceeded`]
    /// without touching the transport when `ctx` has already fired. The raw
    /// response is returned regardless of its status.
    #[instrument(skip_all, fields(method = %request.method, path = %request.url.path()))]
    pub async fn execute(&self, ctx: &Context, mut request: HttpRequest) -> Result<HttpResponse> {
        ctx.check()?;

        let headers = &mut request.headers;
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        request
            .url
            .query_pairs_mut()
            .append_pair("site_uuid", &self.config.site_uuid);

        debug!("Dispatching request");
        let response = ctx.run(self.transport.send(request)).await?;
        debug!(status = response.status, "Received response");

        Ok(response)
    }

    // Crate-internal helpers shared by the resource modules

    /// Absolute URL for `path` with the given query parameters
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format_compact!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| BentoError::config("base_url", format!("cannot build {raw}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// GET `path` and decode the JSON response
    pub(crate) async fn get_json<T>(&self, ctx: &Context, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(Method::GET, self.endpoint(path, query)?);
        let response = self.execute(ctx, request).await?;
        decode(path, &response)
    }

    /// POST `body` as JSON to `path` and decode the JSON response
    pub(crate) async fn post_json<B, T>(&self, ctx: &Context, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(ctx, path, body).await?;
        decode(path, &response)
    }

    /// POST `body` as JSON to `path`, checking the status but ignoring the body
    pub(crate) async fn post<B>(&self, ctx: &Context, path: &str, body: &B) -> Result<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(BentoError::Serialization)?;
        let request = HttpRequest::new(Method::POST, self.endpoint(path, &[])?).with_body(body);

        let response = self.execute(ctx, request).await?;
        ensure_success(&response)?;
        Ok(response)
    }

    /// POST to `path` with parameters in the query string and no body
    pub(crate) async fn post_query<T>(&self, ctx: &Context, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(Method::POST, self.endpoint(path, query)?);
        let response = self.execute(ctx, request).await?;
        decode(path, &response)
    }

    /// POST a batch body and interpret the `results`/`failed` envelope
    pub(crate) async fn post_batch<B>(&self, ctx: &Context, path: &str, body: &B) -> Result<BatchOutcome>
    where
        B: Serialize + ?Sized,
    {
        let outcome: BatchOutcome = self.post_json(ctx, path, body).await?;

        if outcome.failed > 0 {
            debug!(results = outcome.results, failed = outcome.failed, "Batch partially failed");
            return Err(BentoError::PartialBatchFailure {
                results: outcome.results,
                failed: outcome.failed,
            });
        }

        Ok(outcome)
    }
}

/// Map a non-success status onto an API error
pub(crate) fn ensure_success(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    Err(BentoError::api_status(response.status, error_message(&response.body)))
}

/// Check the status and decode the body into `T`
pub(crate) fn decode<T>(endpoint: &str, response: &HttpResponse) -> Result<T>
where
    T: DeserializeOwned,
{
    ensure_success(response)?;
    serde_json::from_str(&response.body)
        .map_err(|e| BentoError::invalid_body(response.status, endpoint, e))
}

/// Best-effort human readable message from an error body
fn error_message(body: &str) -> String {
    if let Ok(api_error) = serde_json::from_str::<BentoApiError>(body) {
        api_error.error.into()
    } else if let Ok(api_error2) = serde_json::from_str::<BentoApiError2>(body) {
        api_error2.message.into()
    } else if body.trim().is_empty() {
        "empty response body".to_string()
    } else {
        body.chars().take(200).collect()
    }
}
