//! Response construction.
//!
//! # Responsibilities
//! - JSON envelope returned by the success and echo branches
//! - Plain-text replies for rejected methods and internal failures
//! - Conversion into an axum response
//!
//! # Design Decisions
//! - Error replies never carry a JSON envelope
//! - Plain text is labelled `text/plain; charset=utf-8`

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::dispatcher::{DispatchError, EchoPayload};

/// Greeting returned for GET.
pub const GREETING: &str = "Hello. This is example service.";

/// Greeting returned by the echo branch.
pub const ECHO_GREETING: &str = "Hello. This is example service. Here is what you've send:";

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Outbound JSON object. `method` and `body` appear only on echo replies.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a EchoPayload>,
}

impl<'a> ResponseEnvelope<'a> {
    pub fn greeting() -> Self {
        Self {
            message: GREETING,
            method: None,
            body: None,
        }
    }

    pub fn echo(method: &'a str, body: &'a EchoPayload) -> Self {
        Self {
            message: ECHO_GREETING,
            method: Some(method),
            body: Some(body),
        }
    }
}

/// A fully materialized dispatcher reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl Reply {
    /// 200 with an encoded JSON body.
    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some(HeaderValue::from_static(APPLICATION_JSON)),
            body: Bytes::from(body),
        }
    }

    /// 405 for a method outside GET/POST/PUT/PATCH.
    pub fn method_not_allowed(method: &str) -> Self {
        Self::text(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method {} is not allowed.", method),
        )
    }

    /// 500 carrying the failure's message verbatim.
    pub fn internal(err: &DispatchError) -> Self {
        Self::text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }

    fn text(status: StatusCode, message: String) -> Self {
        Self {
            status,
            content_type: Some(HeaderValue::from_static(TEXT_PLAIN)),
            body: Bytes::from(message),
        }
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|v| v.as_bytes() == APPLICATION_JSON.as_bytes())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}
