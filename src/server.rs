//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, worker spawning, and Axum server lifecycle.

use crate::application::services::{HitRecorder, RetryPolicy};
use crate::config::{Config, StoreBackend};
use crate::domain::hit_worker::spawn_hit_worker;
use crate::domain::keyspace::KeySpace;
use crate::infrastructure::storage::{MemoryStore, RedisStore, Store};
use crate::routes::app_router;
use crate::state::{AppState, SiteSettings};
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Base delay of the counter write backoff, in milliseconds.
const RETRY_BASE_DELAY_MS: u64 = 10;

/// How long shutdown waits for queued hits to be recorded.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store (or the in-memory store with `STORE=memory`)
/// - Background hit worker
/// - Axum HTTP server
///
/// On Ctrl+C / SIGTERM the server stops accepting requests, then waits up to
/// ten seconds for the hit worker to drain.
///
/// # Errors
///
/// Returns an error if:
/// - The store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let keys = KeySpace::new(config.redis_prefix.clone());

    let recorder = Arc::new(HitRecorder::new(
        store.clone(),
        keys.clone(),
        RetryPolicy::new(config.hit_retry_attempts, RETRY_BASE_DELAY_MS),
    ));
    let (hit_queue, worker) = spawn_hit_worker(
        recorder,
        config.hit_queue_capacity,
        config.hit_worker_concurrency,
    );
    tracing::info!(
        concurrency = config.hit_worker_concurrency,
        "Hit worker started"
    );

    let settings = SiteSettings {
        restrict_domain: config.restrict_domain.clone(),
        redirect_404: config.redirect_404.clone(),
        geo_country_header: config.geo_country_header.clone(),
        base_url: config.base_url.clone(),
        sources_top_n: config.sources_top_n,
    };
    let generator = CodeGenerator::new(config.code_length, config.code_max_attempts);

    let state = AppState::new(store, keys, generator, settings, hit_queue);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last queue handle, so the worker now drains and exits.
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await.is_err() {
        tracing::warn!("Hit worker did not drain in time, pending hits lost");
    }

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Arc<dyn Store>> {
    match (config.store, &config.redis_url) {
        (StoreBackend::Redis, Some(redis_url)) => {
            let store = RedisStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Connected to Redis");
            Ok(Arc::new(store))
        }
        (StoreBackend::Redis, None) => {
            anyhow::bail!("STORE=redis requires REDIS_URL or REDIS_HOST")
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
