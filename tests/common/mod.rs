//! Shared utilities for integration testing.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use image_relay::config::RelayConfig;
use image_relay::http::HttpServer;
use image_relay::lifecycle::Shutdown;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request the mock upstream received.
#[derive(Debug, Clone)]
pub struct Captured {
    /// Last path segment, e.g. `gemini-2.0-flash-exp:generateContent`.
    pub target: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// A running mock of the generation API.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<Captured> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: &'static str,
    received: Arc<Mutex<Vec<Captured>>>,
}

async fn mock_generate(
    State(state): State<MockState>,
    Path(target): Path<String>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.received.lock().unwrap().push(Captured {
        target,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });
    (
        state.status,
        [("content-type", "application/json")],
        state.body,
    )
}

/// Start a mock upstream that answers every generate call with a fixed reply.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/v1beta/models/{target}", post(mock_generate))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, received }
}

/// Relay config pointed at `base_url`, with an explicit credential (or none).
pub fn relay_config(base_url: &str, api_key: Option<&str>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url.to_string();
    config.upstream.api_key = api_key.map(str::to_string);
    config.upstream.api_key_env = "IMAGE_RELAY_TEST_UNSET_VAR".into();
    config.upstream.use_system_proxy = false;
    config.timeouts.connect_secs = 2;
    config.timeouts.request_secs = 5;
    config
}

/// Start the relay on an ephemeral port. Returns the endpoint URL.
pub async fn start_relay(config: RelayConfig) -> (String, Shutdown) {
    let path = config.listener.path.clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}{}", addr, path), shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
