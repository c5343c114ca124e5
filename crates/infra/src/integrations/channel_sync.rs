//! HTTP client for the marketplace channel adapter
//!
//! Every channel is served by the same adapter endpoint; the request body
//! names the channel. The client only classifies transport and status
//! failures; business-level failures pass through as a normal response.
//!
//! A `sync-orders` call imports orders on the adapter side, so only failures
//! where the call never produced a response (connect errors, timeouts) are
//! retried. A 5xx means the adapter ran and failed; it is reported as-is and
//! left for the next scheduled pass.

use std::time::Duration;

use async_trait::async_trait;
use ordersync_core::ChannelSyncPort;
use ordersync_domain::constants::MAX_ERROR_BODY_CHARS;
use ordersync_domain::{
    truncate_chars, AdapterConfig, AdapterError, OrderSyncError, Result, SyncOrdersRequest,
    SyncOrdersResponse,
};
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

/// Longest UTF-8 encoding of a single character.
const MAX_UTF8_BYTES: usize = 4;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the delay between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// How often an undelivered `sync-orders` call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, initial call included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), initial_delay }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based).
    fn delay(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, DEFAULT_RETRY_DELAY)
    }
}

/// `ChannelSyncPort` backed by the adapter's HTTP endpoint.
pub struct HttpChannelSyncClient {
    client: Client,
    endpoint_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl HttpChannelSyncClient {
    /// Client with the given request timeout and the default retry policy.
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ordersync/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .map_err(|err| OrderSyncError::from(InfraError::from(err)))?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
            api_key: None,
            retry: RetryPolicy::default(),
        })
    }

    /// Build the client from configuration.
    pub fn from_config(config: &AdapterConfig) -> Result<Self> {
        let client = Self::new(&config.endpoint_url, Duration::from_secs(config.timeout_secs))?
            .with_retry(RetryPolicy::new(config.max_attempts, DEFAULT_RETRY_DELAY));
        Ok(match &config.api_key {
            Some(key) => client.with_api_key(key.clone()),
            None => client,
        })
    }

    /// Send `Authorization: Bearer {key}` with every call.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn post(&self, request: &SyncOrdersRequest) -> reqwest::Result<Response> {
        let mut builder = self.client.post(&self.endpoint_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder.send().await
    }

    /// POST until a response arrives or the policy gives up.
    async fn post_with_retry(
        &self,
        request: &SyncOrdersRequest,
    ) -> std::result::Result<Response, AdapterError> {
        let mut attempt = 1;
        loop {
            match self.post(request).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.retry.max_attempts && never_answered(&err) => {
                    let delay = self.retry.delay(attempt);
                    warn!(attempt, error = %err, ?delay, "channel adapter unreachable; retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(transport_error(err)),
            }
        }
    }
}

#[async_trait]
impl ChannelSyncPort for HttpChannelSyncClient {
    #[instrument(skip_all, fields(channel = %request.channel))]
    async fn sync_orders(
        &self,
        request: &SyncOrdersRequest,
    ) -> std::result::Result<SyncOrdersResponse, AdapterError> {
        let response = self.post_with_retry(request).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received channel adapter response");

        if !status.is_success() {
            let body = read_truncated_body(response, MAX_ERROR_BODY_CHARS).await;
            warn!(status = status.as_u16(), "channel adapter returned an error status");
            return Err(AdapterError::http(status.as_u16(), &body));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;

        serde_json::from_slice(&bytes).map_err(|err| AdapterError::Decode(err.to_string()))
    }
}

fn never_answered(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

fn transport_error(err: reqwest::Error) -> AdapterError {
    match OrderSyncError::from(InfraError::from(err)) {
        OrderSyncError::Network(message) => AdapterError::Transport(message),
        other => AdapterError::Transport(other.to_string()),
    }
}

/// Read at most `max_chars` characters of the body, stopping the download as
/// soon as enough bytes have arrived. A body that fails mid-read keeps
/// whatever was received.
async fn read_truncated_body(mut response: Response, max_chars: usize) -> String {
    let byte_budget = max_chars.saturating_mul(MAX_UTF8_BYTES);
    let mut buffer = Vec::new();

    while buffer.len() < byte_budget {
        match response.chunk().await {
            Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "error body read interrupted");
                break;
            }
        }
    }

    truncate_chars(&String::from_utf8_lossy(&buffer), max_chars)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request() -> SyncOrdersRequest {
        SyncOrdersRequest {
            action: "sync-orders".into(),
            channel: "smartstore".into(),
            start_date: "2024-05-07".into(),
            end_date: "2024-05-10".into(),
            sub_account_id: None,
        }
    }

    fn client(server: &MockServer) -> HttpChannelSyncClient {
        HttpChannelSyncClient::new(server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_retry(RetryPolicy::none())
    }

    fn retrying_client(url: String, timeout: Duration) -> HttpChannelSyncClient {
        HttpChannelSyncClient::new(url, timeout)
            .unwrap()
            .with_retry(RetryPolicy::new(3, Duration::from_millis(5)))
    }

    #[tokio::test]
    async fn posts_camel_case_body_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer service-key"))
            .and(body_json(serde_json::json!({
                "action": "sync-orders",
                "channel": "smartstore",
                "startDate": "2024-05-07",
                "endDate": "2024-05-10",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "success": true,
                    "synced": 12,
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response =
            client(&server).with_api_key("service-key").sync_orders(&request()).await.unwrap();

        assert_eq!(response.success, Some(true));
        assert_eq!(response.synced, Some(12));
    }

    #[tokio::test]
    async fn long_error_body_is_cut_to_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("가".repeat(1000)))
            .mount(&server)
            .await;

        let err = client(&server).sync_orders(&request()).await.unwrap_err();

        match err {
            AdapterError::Http { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).sync_orders(&request()).await.unwrap_err();
        assert!(matches!(err, AdapterError::Decode(_)));
    }

    #[tokio::test]
    async fn null_success_flag_decodes_as_soft_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": null, "error": "token expired" })),
            )
            .mount(&server)
            .await;

        let response = client(&server).sync_orders(&request()).await.unwrap();
        let result = ordersync_domain::SyncResult::from_adapter(Ok(response));

        assert!(!result.success);
        assert_eq!(result.message, "token expired");
        assert_eq!(result.failure, Some(ordersync_domain::FailureKind::Soft));
    }

    #[tokio::test]
    async fn server_error_is_reported_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = retrying_client(server.uri(), Duration::from_secs(5))
            .sync_orders(&request())
            .await
            .unwrap_err();

        assert_eq!(err, AdapterError::Http { status: 503, body: "upstream down".into() });
    }

    #[tokio::test]
    async fn timed_out_call_is_retried() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = attempts.clone();
        Mock::given(method("POST"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let ok = ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": true, "synced": 2 }));
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    ok.set_delay(Duration::from_secs(2))
                } else {
                    ok
                }
            })
            .mount(&server)
            .await;

        let response = retrying_client(server.uri(), Duration::from_millis(200))
            .sync_orders(&request())
            .await
            .unwrap();

        assert_eq!(response.synced, Some(2));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unreachable_adapter_gives_up_as_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = retrying_client(format!("http://{addr}"), Duration::from_secs(5))
            .sync_orders(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn retry_delay_doubles_and_is_capped() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(40), MAX_RETRY_DELAY);
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn config_sets_attempts_and_key() {
        let config = AdapterConfig { max_attempts: 4, ..AdapterConfig::default() };
        let client = HttpChannelSyncClient::from_config(&config).unwrap();
        assert_eq!(client.retry_policy().max_attempts, 4);
        assert_eq!(client.endpoint_url(), config.endpoint_url);
    }
}
