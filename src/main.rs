// Stint server entrypoint
//!
//! The heavy lifting (initialization, server wiring) lives in dedicated
//! modules so this file remains a thin orchestrator.

mod lifecycle;
mod logging;

use anyhow::Result;
use lifecycle::{bootstrap, run};
use log::info;
use stint_server::config::ServerConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = "config.toml";
    let config = match ServerConfig::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path, e);
            eprintln!("Server cannot start without valid configuration");
            std::process::exit(1);
        }
    };

    // Logging before any other side effects
    let server_log_path = format!("{}/stintd.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &server_log_path,
        config.logging.log_to_console,
        &config.logging.format,
    )?;

    info!("stintd v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    // Build application state
    let components = bootstrap(&config).await?;

    // Run HTTP server until termination signal is received
    run(&config, components).await
}
