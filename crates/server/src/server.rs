//! Router assembly and server lifecycle.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::middleware;
use crate::routes;
use crate::state::AppState;

/// Build the application router. Public so integration tests can drive it
/// without binding a socket.
pub fn build_router(state: AppState) -> Router {
    let cfg = state.config.clone();

    let mut router = Router::new()
        .route("/", get(routes::health::liveness))
        .route("/upload-csv", post(routes::upload::upload_csv))
        .route(
            "/generate-content-stream",
            post(routes::generate::generate_content_stream),
        )
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(DefaultBodyLimit::max(cfg.max_upload_mb * 1024 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(cfg.timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cfg.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

/// Initialize logging, bind, and serve until shutdown is requested.
pub async fn start_server(cfg: ServerConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&cfg.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .ok();

    let addr = format!("{}:{}", cfg.bind_addr, cfg.port);
    let state = AppState::new(cfg);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "server_listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown_signal_received");
}
