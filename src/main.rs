use clap::Parser;

use example_service::config::{self, AppConfig, Cli, ConfigError};
use example_service::lifecycle::{self, Shutdown};
use example_service::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;
    tracing::info!("example-service v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    if let Err(e) = lifecycle::run(config, &shutdown).await {
        tracing::error!(error = %e, "Startup failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
