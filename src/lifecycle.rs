//! Server lifecycle management helpers.
//!
//! This module encapsulates the heavy lifting so `main.rs` remains a thin
//! orchestrator: bootstrapping the store connection and services, and
//! wiring the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use log::{debug, info};
use stint_core::JobManager;
use stint_secrets::CubbyholeResolver;
use stint_server::config::ServerConfig;
use stint_store::RedisJobStore;

/// Aggregated application components shared across the HTTP server.
pub struct ApplicationComponents {
    pub manager: Arc<JobManager>,
}

/// Connect the shared job store and build the lifecycle manager.
pub async fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let phase_start = std::time::Instant::now();

    let store = RedisJobStore::connect(&config.store.url, &config.store.key_prefix)
        .await
        .context("failed to connect the shared job store")?;
    info!(
        "Job store connected at {} ({:.2}ms)",
        config.store.url,
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    // The secret service address is re-read from the environment on every
    // submission; only the request timeout is fixed at startup.
    let resolver = CubbyholeResolver::from_env(Duration::from_secs(
        config.secrets.request_timeout_seconds,
    ));
    debug!(
        "Secret resolver ready (request timeout {}s)",
        config.secrets.request_timeout_seconds
    );

    let manager = Arc::new(JobManager::new(
        Arc::new(store),
        Arc::new(resolver),
        config.server.node_id,
    ));

    Ok(ApplicationComponents { manager })
}

/// Run the HTTP server until termination.
pub async fn run(config: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    debug!("Endpoints: POST /v1/api/jobs, GET /v1/api/jobs/{{job_id}}");

    let manager = components.manager.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(manager.clone()))
            .configure(stint_api::routes::configure_routes)
    })
    .bind(&bind_addr)?
    .workers(if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    })
    .run()
    .await?;

    Ok(())
}
