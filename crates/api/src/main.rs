use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nethub_api::background;
use nethub_api::config::ServerConfig;
use nethub_api::router::build_app_router;
use nethub_api::state::AppState;
use nethub_jobs::{JobTracker, SimulatedExecutor, StageExecutor};
use nethub_registry::EntityStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nethub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Registry and job tracking ---
    let store = Arc::new(EntityStore::with_history_cap(config.history_cap));
    let jobs = Arc::new(JobTracker::new());
    let executor: Arc<dyn StageExecutor> = Arc::new(SimulatedExecutor::new(
        Duration::from_millis(config.stage_delay_ms),
    ));
    tracing::info!(history_cap = config.history_cap, "Entity registry created");

    // --- Staleness sweeper ---
    let sweeper_cancel = tokio_util::sync::CancellationToken::new();
    let sweeper_handle = tokio::spawn(background::stale::run(
        Arc::clone(&store),
        config.stale_after_secs,
        config.stale_check_interval_secs,
        sweeper_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        store,
        jobs,
        executor,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!("Staleness sweeper stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
