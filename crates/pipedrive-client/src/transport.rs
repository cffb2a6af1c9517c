//! Request transport for the Pipedrive REST API.
//!
//! Resource clients speak to the API only through the [`Transport`] trait,
//! handing it an [`ApiRequest`] and receiving the decoded response envelope.
//! [`HttpTransport`] is the reqwest-backed implementation used in
//! production; tests substitute `testing::MockTransport`.
//!
//! The transport never retries. Non-2xx responses become
//! [`ClientError::Api`] carrying the status code, the server's error
//! message and the raw body.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::payload::{Payload, QueryParams};
use crate::response::ApiResponse;

/// Header carrying the company API token.
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Pipedrive REST API generation a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call against the API: method, version-relative path, optional JSON
/// body and query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: QueryParams,
    pub version: ApiVersion,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
            version: ApiVersion::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn json(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn payload(self, payload: Payload) -> Self {
        self.json(payload.into_value())
    }

    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Route to the v1 API (notes, comments, users, deal fields).
    #[must_use]
    pub fn v1(mut self) -> Self {
        self.version = ApiVersion::V1;
        self
    }
}

/// Async boundary between the resource clients and the network.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn request(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// reqwest-backed transport authenticating with the company API token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        format!(
            "{}{}",
            self.config.versioned_base_url(request.version),
            request.path
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = self.url_for(&request);
        debug!(method = %request.method, %url, query = %request.query, "Sending Pipedrive request");

        let token = HeaderValue::from_str(self.config.api_token())
            .map_err(|_| ClientError::config_error("API token contains invalid header characters"))?;

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(API_TOKEN_HEADER, token)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = decode_error_body(&text);
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            warn!(
                status = status.as_u16(),
                method = %request.method,
                path = %request.path,
                %message,
                "Pipedrive API returned an error"
            );
            return Err(ClientError::api_error(status.as_u16(), message, body));
        }

        if text.trim().is_empty() {
            return Ok(ApiResponse::new(json!({ "success": true })));
        }
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::invalid_response("body", e.to_string()))?;
        Ok(ApiResponse::new(body))
    }
}

fn decode_error_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// `error` plus `error_info` when the server supplies both.
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").and_then(Value::as_str)?;
    match body.get("error_info").and_then(Value::as_str) {
        Some(info) if !info.is_empty() => Some(format!("{error} ({info})")),
        _ => Some(error.to_string()),
    }
}
