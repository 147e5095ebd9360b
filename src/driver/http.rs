// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP Driver
//!
//! Sink: requests. Source: responses.
//!
//! Only the latest request per URL is in flight. When a newer request for
//! the same URL arrives, the older one is aborted and its response never
//! reaches the source:
//!
//! ```text
//! Sink:      GET /u ─────── GET /u ──────────────
//! Transport:   ├──────X       ├──────────┤
//! Source:                                ● (second)
//! ```
//!
//! Transport failures are logged and produce no value.

use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{Driver, DriverOutput, DriverResult};
use crate::errors::DriverError;
use crate::payload::Payload;
use crate::stream::{proxy, PayloadSource, PayloadStream, ProxyFeed};

/// Channel name the HTTP driver is registered under
pub const HTTP: &str = "HTTP";

/// Outgoing request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// Upper-case method name
    pub method: String,
}

impl HttpRequest {
    /// Request with an explicit method
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into().to_ascii_uppercase(),
        }
    }

    /// `GET` request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }
}

/// Response emitted on the HTTP source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Identifier the driver assigned to the request
    pub request_id: Uuid,
    /// The request this answers
    pub request: HttpRequest,
    /// Status code
    pub status: u16,
    /// Body, parsed as JSON when possible and a JSON string otherwise
    pub body: Value,
}

/// What a transport returns for one request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// Status code
    pub status: u16,
    /// Body
    pub body: Value,
}

/// Performs requests on behalf of the HTTP driver
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and wait for its response
    async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, DriverError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `User-Agent` header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("cycle-runtime/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Transport over `reqwest`
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl ReqwestTransport {
    /// Build a client from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, DriverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DriverError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, DriverError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            DriverError::Transport(format!("Invalid method {}: {}", request.method, e))
        })?;

        let response = self
            .client
            .request(method, request.url.as_str())
            .send()
            .await
            .map_err(|e| DriverError::Transport(format!("{} {}: {}", request.method, request.url, e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DriverError::Transport(format!("Failed to read body: {}", e)))?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));

        Ok(TransportResponse { status, body })
    }
}

/// Transport answering from a fixed routing table
///
/// Every answer is delayed by the configured latency; unknown URLs fail.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    routes: HashMap<String, TransportResponse>,
    latency: Duration,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl StaticTransport {
    /// Transport with no routes and no latency
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`
    pub fn route(mut self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.routes
            .insert(url.into(), TransportResponse { status, body });
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every request sent so far, including aborted ones
    pub fn sent(&self) -> Vec<HttpRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HttpRequest>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, DriverError> {
        self.lock().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.routes
            .get(&request.url)
            .cloned()
            .ok_or_else(|| DriverError::Transport(format!("no route for {}", request.url)))
    }
}

/// Sends the HTTP sink's requests and emits their responses
pub struct HttpDriver {
    transport: Arc<dyn Transport>,
}

impl HttpDriver {
    /// Driver sending through `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for HttpDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HttpDriver")
    }
}

fn spawn_request(
    transport: Arc<dyn Transport>,
    feed: ProxyFeed<Payload>,
    request: HttpRequest,
) -> JoinHandle<()> {
    let request_id = Uuid::now_v7();
    tokio::spawn(async move {
        debug!(%request_id, method = %request.method, url = %request.url, "Sending request");
        match transport.send(&request).await {
            Ok(response) => {
                info!(%request_id, url = %request.url, status = response.status, "Response received");
                feed.push(Payload::Response(HttpResponse {
                    request_id,
                    request,
                    status: response.status,
                    body: response.body,
                }));
            }
            Err(e) => {
                warn!(%request_id, url = %request.url, error = %e, "Request failed");
            }
        }
    })
}

async fn request_loop(
    transport: Arc<dyn Transport>,
    mut sink: PayloadStream,
    feed: ProxyFeed<Payload>,
) {
    let mut in_flight: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(payload) = sink.next().await {
        let request = match payload {
            Payload::Request(request) => request,
            other => {
                let e = DriverError::UnexpectedPayload {
                    expected: "http request",
                    found: other.kind(),
                };
                error!(error = %e, "HTTP sink value skipped");
                continue;
            }
        };

        if let Some(previous) = in_flight.remove(&request.url) {
            if previous.is_finished() {
                report(&request.url, previous.await);
            } else {
                debug!(url = %request.url, "Superseding in-flight request");
                previous.abort();
            }
        }
        let url = request.url.clone();
        let handle = spawn_request(transport.clone(), feed.clone(), request);
        in_flight.insert(url, handle);
    }

    let panicked = settle(in_flight).await;
    debug!(panicked, "HTTP sink completed");
}

/// Wait for the remaining requests, returning how many panicked
async fn settle(in_flight: HashMap<String, JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for (url, handle) in in_flight {
        if report(&url, handle.await) {
            panicked += 1;
        }
    }
    panicked
}

fn report(url: &str, result: Result<(), JoinError>) -> bool {
    match result {
        Err(e) if e.is_panic() => {
            error!(url = %url, error = %e, "Request task panicked");
            true
        }
        _ => false,
    }
}

impl Driver for HttpDriver {
    fn drive(self: Box<Self>, sink: PayloadStream) -> DriverResult {
        let (feed, source) = proxy::channel::<Payload>();
        let responses = source.stream();
        let task = tokio::spawn(request_loop(self.transport, sink, feed));
        Ok(DriverOutput::with_source(task, responses))
    }
}

/// Typed view over the HTTP channel's source
#[derive(Debug, Clone)]
pub struct HttpSource {
    source: PayloadSource,
}

impl HttpSource {
    /// Wrap the HTTP channel's proxy source
    pub fn new(source: PayloadSource) -> Self {
        Self { source }
    }

    /// Every response
    pub fn all(&self) -> BoxStream<'static, HttpResponse> {
        self.source
            .stream()
            .filter_map(|payload| future::ready(payload.into_response()))
            .boxed()
    }

    /// Responses to requests for exactly `url`
    pub fn responses(&self, url: &str) -> BoxStream<'static, HttpResponse> {
        let url = url.to_string();
        self.all()
            .filter(move |response| future::ready(response.request.url == url))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;

    const USERS: &str = "http://api.test/users/1";

    #[test]
    fn test_config_defaults() {
        let config: HttpConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("cycle-runtime/"));
        assert_eq!(config, HttpConfig::default());
    }

    #[test]
    fn test_method_is_upper_case() {
        assert_eq!(HttpRequest::new("post", USERS).method, "POST");
        assert_eq!(HttpRequest::get(USERS).method, "GET");
    }

    #[tokio::test]
    async fn test_response_is_emitted() {
        let transport = StaticTransport::new().route(USERS, 200, json!({"name": "Leanne"}));
        let driver = Box::new(HttpDriver::new(Arc::new(transport)));

        let output = driver
            .drive(stream::iter(vec![Payload::Request(HttpRequest::get(USERS))]).boxed())
            .unwrap();
        let responses: Vec<HttpResponse> = output
            .source
            .unwrap()
            .filter_map(|payload| future::ready(payload.into_response()))
            .collect()
            .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].status, 200);
        assert_eq!(responses[0].body["name"], "Leanne");
        assert_eq!(responses[0].request.url, USERS);
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, DriverError> {
            if request.url == USERS {
                panic!("transport exploded");
            }
            Ok(TransportResponse {
                status: 204,
                body: Value::Null,
            })
        }
    }

    async fn explode() {
        panic!("transport exploded")
    }

    #[tokio::test]
    async fn test_panicking_request_is_counted() {
        let mut in_flight = HashMap::new();
        in_flight.insert(USERS.to_string(), tokio::spawn(explode()));
        in_flight.insert("http://api.test/ok".to_string(), tokio::spawn(async {}));

        assert_eq!(settle(in_flight).await, 1);
    }

    #[tokio::test]
    async fn test_panicking_transport_leaves_driver_running() {
        let driver = Box::new(HttpDriver::new(Arc::new(PanickingTransport)));

        let output = driver
            .drive(
                stream::iter(vec![
                    Payload::Request(HttpRequest::get(USERS)),
                    Payload::Request(HttpRequest::get("http://api.test/ok")),
                ])
                .boxed(),
            )
            .unwrap();
        let emitted: Vec<Payload> = output.source.unwrap().collect().await;

        assert_eq!(emitted.len(), 1);
        for task in output.tasks {
            assert!(task.await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_transport_error_produces_nothing() {
        let transport = StaticTransport::new();
        let driver = Box::new(HttpDriver::new(Arc::new(transport.clone())));

        let output = driver
            .drive(
                stream::iter(vec![
                    Payload::Request(HttpRequest::get(USERS)),
                    Payload::Integer(1),
                ])
                .boxed(),
            )
            .unwrap();
        let emitted: Vec<Payload> = output.source.unwrap().collect().await;

        assert!(emitted.is_empty());
        assert_eq!(transport.sent().len(), 1);
    }
}
