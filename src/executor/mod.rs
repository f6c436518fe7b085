pub mod shape;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::config::HarnessConfig;
use crate::console::Console;
use crate::error::RequestError;
use shape::{classify, truncate_chars, ERROR_BODY_LIMIT};

/// One check to perform: label, path and what to send
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    pub name: String,
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl EndpointRequest {
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post_json(name: impl Into<String>, path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get(name, path)
        }
    }

    /// Later headers with the same name replace earlier ones
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A response that made it back with a success status
#[derive(Debug)]
struct Exchange {
    status: StatusCode,
    elapsed: Duration,
    body: Value,
}

/// Issues one request at a time against the base URL and reports each outcome
pub struct RequestExecutor {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    console: Arc<Console>,
}

impl RequestExecutor {
    pub fn new(config: &HarnessConfig, console: Arc<Console>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            console,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform the request and report it. Every failure is reported and
    /// turned into `None`; nothing propagates to the caller.
    pub async fn execute(&self, request: EndpointRequest) -> Option<Value> {
        match self.dispatch(&request).await {
            Ok(exchange) => {
                self.report_success(&request.name, &exchange);
                Some(exchange.body)
            }
            Err(err) => {
                tracing::debug!("{} {} failed: {}", request.method, request.path, err);
                self.report_failure(&request.name, &err);
                None
            }
        }
    }

    async fn dispatch(&self, request: &EndpointRequest) -> Result<Exchange, RequestError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!("Dispatching {} {}", request.method, url);

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::unexpected(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RequestError::unexpected(format!("invalid header value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(self.timeout);

        if let Some(body) = &request.body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.headers(headers).send().await?;
        let elapsed = started.elapsed();
        let status = response.status();

        if !status.is_success() {
            // Error bodies are only previewed, so invalid UTF-8 is tolerated here
            let body = match response.bytes().await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::debug!("{} {} error body unreadable: {}", request.method, url, e);
                    format!("<unreadable body: {}>", e)
                }
            };
            return Err(RequestError::http(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RequestError::unexpected(format!("failed to read response body: {}", e)))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| RequestError::unexpected(format!("response body is not valid UTF-8: {}", e)))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        tracing::debug!("{} {} -> {} in {:?}", request.method, url, status, elapsed);
        Ok(Exchange { status, elapsed, body })
    }

    fn report_success(&self, name: &str, exchange: &Exchange) {
        let elapsed_ms = exchange.elapsed.as_secs_f64() * 1000.0;
        self.console.line(format!(
            "    [SUCCESS] {} | Status: {} ({:.1}ms)",
            name,
            exchange.status.as_u16(),
            elapsed_ms
        ));
        self.console.line(format!("      -> {}", classify(&exchange.body).summary()));
    }

    fn report_failure(&self, name: &str, err: &RequestError) {
        match err {
            RequestError::Http { status, body } => {
                self.console.line(format!("    [HTTP ERROR] {} | Status: {}", name, status));
                self.console.line(format!(
                    "      -> Response: {}",
                    truncate_chars(body, ERROR_BODY_LIMIT)
                ));
            }
            RequestError::Connection(reason) => {
                self.console.line(format!("    [CONNECTION FAILED] {} | Reason: {}", name, reason));
            }
            RequestError::Unexpected(message) => {
                self.console.line(format!("    [UNEXPECTED ERROR] {} | Error: {}", name, message));
            }
        }
    }
}
