use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veritas_api::config::ServerConfig;
use veritas_api::router::build_app_router;
use veritas_api::state::AppState;
use veritas_db::kv::StoreBackend;
use veritas_db::StoreConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veritas_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store_config = StoreConfig::from_env().expect("Invalid key-value store configuration");
    let store =
        veritas_db::connect(&store_config).expect("Failed to create key-value store client");
    match &store_config.backend {
        StoreBackend::Memory => tracing::info!("Using in-memory key-value store"),
        StoreBackend::Rest { url, .. } => tracing::info!(%url, "Using REST key-value store"),
    }

    // An unreachable store is not fatal: reads answer 503 until it comes back.
    match veritas_db::health_check(store.as_ref()).await {
        Ok(()) => tracing::info!("Store health check passed"),
        Err(e) => tracing::warn!(error = %e, "Store health check failed, starting degraded"),
    }

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

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

    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // Bound the drain: once the signal fires, give in-flight requests
    // `SHUTDOWN_TIMEOUT_SECS` before exiting anyway.
    tokio::select! {
        result = server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(timeout_secs = drain.as_secs(), "Shutdown drain timed out");
        }
    }

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
