//! catalog-server - product catalog with discount pricing.
//!
//! Reads config from an optional TOML file (`--config`), then env vars:
//!   DB_FILE     - SQLite file (default: in-memory)
//!   HTTP_PORT   - listen port (default: 8080)
//!   LOG_LEVEL   - log filter (default: info)
//!   LOG_FORMAT  - pretty or json (default: pretty)

use anyhow::{Context, Result};
use catalog_observability::Logger;
use catalog_server::{build_app, Cli};
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("Failed to load configuration")?;
    config.logging.init();

    let logger = Logger::new("catalog");
    let app = build_app(&config, &logger).await?;

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    logger
        .with_field("transport", "http")
        .with_field("port", config.port)
        .info("Transport Start");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(logger.clone()))
        .await
        .context("Server error")?;

    logger.info("Service gracefully shut down");
    Ok(())
}

async fn shutdown_signal(logger: Logger) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger.with_error(&e).error("Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    logger.with_field("transport", "http").info("Transport Stopped");
}
