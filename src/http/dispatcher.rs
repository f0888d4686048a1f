//! Request dispatcher.
//!
//! Classifies each request by method and produces a complete [`Reply`]:
//!
//! ```text
//! GET               → 200 {"message": ...}            (body ignored)
//! POST, PUT, PATCH  → read body ("" becomes "{}")
//!                   → decode JSON object
//!                   → 200 {"message", "method", "body"}
//! anything else     → 405 "Method <M> is not allowed."
//! read/decode/encode failure → 500 <failure message>
//! ```
//!
//! Method tokens are matched exactly, so `get` or `HEAD` are rejected.
//! Every call emits one [`TimingRecord`], on every branch.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::{Reply, ResponseEnvelope};
use crate::observability::{Stopwatch, TimingRecord, TimingSink};

/// Decoded echo payload: an insertion-ordered JSON object.
pub type EchoPayload = Map<String, Value>;

/// Failures inside the dispatcher. All of them map to a 500 reply whose body
/// is the underlying message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    ReadBody(#[source] axum::Error),

    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    #[error("{0}")]
    Encode(#[source] serde_json::Error),
}

/// Per-request handler for the configured path.
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<ServiceConfig>,
    max_body_bytes: usize,
    sink: Arc<dyn TimingSink>,
}

impl Dispatcher {
    pub fn new(service: Arc<ServiceConfig>, max_body_bytes: usize, sink: Arc<dyn TimingSink>) -> Self {
        Self {
            service,
            max_body_bytes,
            sink,
        }
    }

    /// Handle one request end to end and record its timing.
    pub async fn handle(&self, request: Request<Body>) -> Reply {
        let watch = Stopwatch::start();

        let (parts, body) = request.into_parts();
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let reply = self.dispatch(&parts.method, body).await;

        self.sink.record(TimingRecord {
            url,
            method: parts.method.to_string(),
            status: reply.status.as_u16(),
            request_id,
            elapsed_micros: watch.elapsed_micros(),
        });
        reply
    }

    async fn dispatch(&self, method: &Method, body: Body) -> Reply {
        let result = match method.as_str() {
            "GET" => greet(),
            "POST" | "PUT" | "PATCH" => self.echo(method.as_str(), body).await,
            other => {
                tracing::debug!(method = other, path = %self.service.path, "Method rejected");
                return Reply::method_not_allowed(other);
            }
        };

        result.unwrap_or_else(|err| {
            tracing::warn!(method = %method, error = %err, "Request failed");
            Reply::internal(&err)
        })
    }

    async fn echo(&self, method: &str, body: Body) -> Result<Reply, DispatchError> {
        let mut raw = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(DispatchError::ReadBody)?;
        if raw.is_empty() {
            raw = Bytes::from_static(b"{}");
        }

        let payload: EchoPayload = serde_json::from_slice(&raw).map_err(DispatchError::Decode)?;
        let encoded = serde_json::to_vec(&ResponseEnvelope::echo(method, &payload))
            .map_err(DispatchError::Encode)?;
        Ok(Reply::json(encoded))
    }
}

fn greet() -> Result<Reply, DispatchError> {
    let encoded =
        serde_json::to_vec(&ResponseEnvelope::greeting()).map_err(DispatchError::Encode)?;
    Ok(Reply::json(encoded))
}
