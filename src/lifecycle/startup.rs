//! Startup orchestration.
//!
//! Order is fixed: resolve config → build routes → register on the gateway
//! → start metrics → bind the listener → serve. A registration failure or a
//! shutdown request aborts startup before any socket is opened.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ServiceConfig};
use crate::gateway::{KongGateway, Registrar, RegistrationError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, LogSink};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to register on the API Gateway: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(String),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Register `service` through `registrar`, once.
pub async fn register_service<R: Registrar>(
    registrar: &R,
    service: &ServiceConfig,
) -> Result<(), StartupError> {
    tracing::info!(
        service = %service.name,
        virtual_host = %service.virtual_host,
        "Registering on API gateway"
    );
    registrar.register(service).await?;
    tracing::info!("Registered on API Gateway.");
    Ok(())
}

/// Run the service until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let service = config.service_config();
    log_configuration(&config, &service);

    // Routes are built before anything is announced to the gateway.
    let server = HttpServer::new(service.clone(), &config.listener, Arc::new(LogSink));

    if config.gateway.skip_registration {
        tracing::info!("Skipped Gateway registration.");
    } else {
        let gateway = KongGateway::new(&config.gateway)?;
        tokio::select! {
            registered = register_service(&gateway, &service) => registered?,
            _ = shutdown.triggered() => {
                tracing::info!("Shutdown requested during gateway registration");
                return Ok(());
            }
        }
    }

    if shutdown.is_triggered() {
        tracing::info!("Shutdown requested before listening");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e: std::net::AddrParseError| StartupError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %address, "Listening");

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

fn log_configuration(config: &AppConfig, service: &ServiceConfig) {
    tracing::info!(
        port = service.port,
        gateway_admin_url = %config.gateway.admin_url,
        service_name = %service.name,
        namespace = %config.service.namespace,
        organization = %config.service.organization,
        domain = %config.service.domain,
        path = %service.path,
        "Service configuration"
    );
    tracing::info!(pattern = %service.route_pattern, "URL pattern");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeRegistrar {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeRegistrar {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl Registrar for FakeRegistrar {
        async fn register(&self, _service: &ServiceConfig) -> Result<(), RegistrationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(RegistrationError::Rejected {
                    entity: "service".into(),
                    status: 409,
                    body: "conflict".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_register_service_calls_registrar_once() {
        let registrar = FakeRegistrar::new(false);
        let service = AppConfig::default().service_config();

        register_service(&registrar, &service).await.unwrap();
        assert_eq!(registrar.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_registration_failure_is_startup_error() {
        let registrar = FakeRegistrar::new(true);
        let service = AppConfig::default().service_config();

        let err = register_service(&registrar, &service).await.unwrap_err();
        assert!(matches!(err, StartupError::Registration(_)));
        assert_eq!(
            err.to_string(),
            "Failed to register on the API Gateway: gateway rejected service: 409 conflict"
        );
    }

    #[tokio::test]
    async fn test_shutdown_before_run_returns_without_binding() {
        let mut config = AppConfig::default();
        config.gateway.skip_registration = true;
        config.listener.bind_host = "127.0.0.1".into();
        config.service.port = 28392;

        let shutdown = Shutdown::new();
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), run(config, &shutdown))
            .await
            .expect("run ignored an earlier shutdown request");
        assert!(result.is_ok());
        assert!(std::net::TcpListener::bind("127.0.0.1:28392").is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_stalled_registration() {
        // Accepts connections but never answers.
        let stalled = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let admin = stalled.local_addr().unwrap();

        let mut config = AppConfig::default();
        config.gateway.admin_url = format!("http://{}", admin);
        config.gateway.timeout_secs = 30;
        config.listener.bind_host = "127.0.0.1".into();
        config.service.port = 28393;

        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.trigger();
        });

        let result = tokio::time::timeout(Duration::from_secs(5), run(config, &shutdown))
            .await
            .expect("shutdown did not interrupt registration");
        assert!(result.is_ok());
        drop(stalled);
    }

    #[tokio::test]
    async fn test_invalid_admin_url_aborts_before_binding() {
        let mut config = AppConfig::default();
        config.gateway.admin_url = "mailto:ops@example.com".into();
        config.listener.bind_host = "127.0.0.1".into();
        config.service.port = 28391;

        let err = run(config, &Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Registration(_)));
        assert!(std::net::TcpListener::bind("127.0.0.1:28391").is_ok());
    }
}
