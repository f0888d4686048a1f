//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the axum Router serving the configured path
//! - Wire up middleware (request ID, tracing)
//! - Hand every request on that path to the dispatcher
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use crate::config::{ListenerConfig, ServiceConfig};
use crate::http::dispatcher::Dispatcher;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::TimingSink;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP server for the service's single path.
pub struct HttpServer {
    router: Router,
    service: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server for `service`.
    pub fn new(service: ServiceConfig, listener: &ListenerConfig, sink: Arc<dyn TimingSink>) -> Self {
        let service = Arc::new(service);
        let dispatcher = Dispatcher::new(service.clone(), listener.max_body_bytes, sink);
        let router = Self::build_router(&service.path, AppState { dispatcher });
        Self { router, service }
    }

    /// Build the axum router with all middleware layers.
    ///
    /// A path ending in `/` also serves everything below it.
    fn build_router(path: &str, state: AppState) -> Router {
        let mut router = Router::new().route(path, any(dispatch_handler));
        if path.ends_with('/') {
            router = router.route(&format!("{}{{*rest}}", path), any(dispatch_handler));
        }
        router
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until the shutdown flag is set.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.service.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|requested| *requested).await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.dispatcher.handle(request).await.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::observability::LogSink;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server(path: &str) -> HttpServer {
        let mut config = AppConfig::default();
        config.service.path = path.to_string();
        HttpServer::new(config.service_config(), &config.listener, Arc::new(LogSink))
    }

    async fn status_of(router: Router, method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_serves_only_configured_path() {
        let server = server("/example");
        assert_eq!(status_of(server.router(), "GET", "/example").await, StatusCode::OK);
        assert_eq!(status_of(server.router(), "GET", "/other").await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(server.router(), "GET", "/example/child").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_serves_subtree() {
        let server = server("/api/");
        assert_eq!(status_of(server.router(), "GET", "/api/").await, StatusCode::OK);
        assert_eq!(status_of(server.router(), "POST", "/api/a/b").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_colon_and_star_inside_segment_are_literal() {
        let colon_server = server("/v1:beta/items");
        assert_eq!(status_of(colon_server.router(), "GET", "/v1:beta/items").await, StatusCode::OK);

        let star_server = server("/a*b/");
        assert_eq!(status_of(star_server.router(), "GET", "/a*b/c").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejected_method_reaches_dispatcher() {
        let server = server("/example");
        assert_eq!(
            status_of(server.router(), "DELETE", "/example").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let server = server("/example");
        let request = Request::builder()
            .uri("/example")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");

        let request = Request::builder().uri("/example").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
