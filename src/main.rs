//! Profile Service - user profile records over PostgreSQL with an
//! in-memory read-through cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use profile_service::api::{create_router, AppState};
use profile_service::config::{Config, StoreBackend};
use profile_service::store::{MemoryUserStore, PgUserStore, UserStore};
use profile_service::{telemetry, ProfileService};

/// Main entry point for the profile service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Install the Prometheus recorder
/// 4. Connect the store and make sure the schema exists
/// 5. Create the service and the Axum router
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM, then close the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profile service");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        backend = ?config.store_backend,
        database = ?config.database,
        "Configuration loaded"
    );

    let metrics = telemetry::install_recorder().context("installing metrics recorder")?;

    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pg = PgUserStore::connect(&config.database)
                .await
                .context("connecting to database")?;
            pg.ensure_schema().await.context("creating users table")?;
            Arc::new(pg)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let service = ProfileService::new(store.clone());
    let app = create_router(AppState::new(service).with_metrics(metrics));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
