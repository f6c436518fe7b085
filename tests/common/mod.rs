#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use school_api_smoke::config::HarnessConfig;
use school_api_smoke::console::{CapturedOutput, Console};
use school_api_smoke::runner::RoleTestRunner;

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header("authorization").first().copied()
    }
}

#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    pub fn all(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.all().into_iter().map(|r| r.path).collect()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub log: RequestLog,
}

impl MockBackend {
    /// Serve `router` on a free local port, recording every request it sees
    pub async fn spawn(router: Router) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;

        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            log,
        })
    }

    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::default().with_base_url(self.base_url.clone())
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    log.0.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        headers,
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(axum::http::Request::from_parts(parts, Body::from(bytes))).await
}

/// Base URL where nothing is listening
pub fn unreachable_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn captured_runner(config: HarnessConfig) -> Result<(RoleTestRunner, CapturedOutput)> {
    let (console, output) = Console::captured();
    let runner = RoleTestRunner::new(config, Arc::new(console))?;
    Ok((runner, output))
}

/// Login route answering per email; unknown emails get 401
pub fn login_route(responses: Vec<(&str, StatusCode, Value)>) -> Router {
    let responses: Arc<HashMap<String, (StatusCode, Value)>> = Arc::new(
        responses
            .into_iter()
            .map(|(email, status, body)| (email.to_string(), (status, body)))
            .collect(),
    );

    Router::new().route(
        "/api/auth/login",
        post(move |Json(payload): Json<Value>| {
            let responses = responses.clone();
            async move {
                let email = payload["email"].as_str().unwrap_or_default();
                match responses.get(email) {
                    Some((status, body)) => (*status, Json(body.clone())).into_response(),
                    None => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"success": false, "message": "Invalid credentials"})),
                    )
                        .into_response(),
                }
            }
        }),
    )
}

/// Every configured listing endpoint, each returning two records
pub fn listing_routes(config: &HarnessConfig) -> Router {
    config.endpoints.iter().fold(Router::new(), |router, endpoint| {
        router.route(
            &endpoint.path,
            get(|| async { Json(json!({"success": true, "data": [{"id": 1}, {"id": 2}]})) }),
        )
    })
}

pub fn health_route() -> Router {
    Router::new().route("/health", get(|| async { Json(json!({"status": "ok"})) }))
}

pub fn token_body(token: &str) -> Value {
    json!({"success": true, "data": {"token": token}})
}

pub fn slow_route(path: &str, delay: Duration) -> Router {
    Router::new().route(
        path,
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"success": true, "data": []}))
        }),
    )
}

/// Answer a single connection with canned bytes, then hang up
pub async fn spawn_raw(response: &'static [u8]) -> Result<String> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind raw backend")?;

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(format!("http://127.0.0.1:{}", port))
}
