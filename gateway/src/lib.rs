//! HTTP gateway for the todo client, backed by `reqwest`.
//!
//! # Design
//! The gateway is configured once from a [`GatewayConfig`] and is read-only
//! afterwards: fixed base address, fixed per-request timeout, fixed JSON
//! content-type header, no authentication. It executes the plain-data
//! requests built by `TodoClient` and returns every response as data,
//! whatever its status; only transport failures and timeouts are errors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use thiserror::Error;
use todo_sync::{ApiError, Gateway, HttpMethod, HttpRequest, HttpResponse, TodoClient};

pub const DEFAULT_BASE_URL: &str = "https://good-ol-todo-list.herokuapp.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Whole round-trip, connect through body.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The request builder bound to the same base address.
    pub fn todo_client(&self) -> TodoClient {
        TodoClient::new(&self.base_url)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    http: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        tracing::debug!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "gateway ready");
        Ok(Self { http })
    }
}

impl Gateway for ReqwestGateway {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.http.request(method(request.method), &request.path);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, headers, body })
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}
