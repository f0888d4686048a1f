//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use example_service::config::AppConfig;
use example_service::lifecycle::{self, Shutdown, StartupError};

/// One call received by the mock admin API.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct AdminCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct MockKong {
    pub calls: Arc<Mutex<Vec<AdminCall>>>,
    /// Targets reported by `GET /upstreams/{name}/targets`.
    pub existing_targets: Vec<String>,
    /// Paths starting with this prefix answer 500.
    pub fail_prefix: Option<String>,
}

#[allow(dead_code)]
impl MockKong {
    pub fn recorded(&self) -> Vec<AdminCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn admin_handler(
    State(mock): State<MockKong>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body = serde_json::from_slice::<Value>(&body).ok();
    mock.calls.lock().unwrap().push(AdminCall {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
    });

    if mock.fail_prefix.as_deref().is_some_and(|p| path.starts_with(p)) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "admin api exploded").into_response();
    }

    if method == Method::GET && path.ends_with("/targets") {
        let data: Vec<Value> = mock
            .existing_targets
            .iter()
            .map(|t| json!({ "target": t, "weight": 100 }))
            .collect();
        return Json(json!({ "data": data })).into_response();
    }

    let status = if method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(body.unwrap_or(Value::Null))).into_response()
}

/// Start a mock Kong admin API on an ephemeral loopback port.
pub async fn start_mock_kong(mock: MockKong) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(admin_handler).with_state(mock);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Configuration for a service on `127.0.0.1:port` registering with `admin`.
#[allow(dead_code)]
pub fn service_config(port: u16, admin: Option<SocketAddr>) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_host = "127.0.0.1".into();
    config.service.port = port;
    config.gateway.target_host = Some("10.1.2.3".into());
    match admin {
        Some(addr) => config.gateway.admin_url = format!("http://{}", addr),
        None => config.gateway.skip_registration = true,
    }
    config
}

/// Run the full startup sequence in the background.
#[allow(dead_code)]
pub fn spawn_service(
    config: AppConfig,
    shutdown: &Shutdown,
) -> tokio::task::JoinHandle<Result<(), StartupError>> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move { lifecycle::run(config, &shutdown).await })
}

/// Wait until something accepts connections on `addr`.
#[allow(dead_code)]
pub async fn wait_for_listener(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening on {addr}");
}
