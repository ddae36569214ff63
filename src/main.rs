mod config;
mod models;
mod monitor;
mod probe;
mod routes;
mod severity;
mod timeline;

#[cfg(not(unix))]
use std::future;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use config::Config;
use monitor::Monitor;
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::load_config,
    routes::{api_status, history, services},
};

#[derive(Clone)]
struct AppContext {
    config: Config,
    monitor: Arc<Monitor>,
}

async fn start_api(config: Config, monitor: Arc<Monitor>) -> anyhow::Result<()> {
    let ctx = AppContext {
        config: config.clone(),
        monitor,
    };

    let router = Router::new()
        .route("/services", get(services))
        .route("/history", get(history))
        .route("/api/status", get(api_status))
        .layer(Extension(ctx))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(10)));

    let listener = TcpListener::bind(&config.api.bind).await?;
    info!("api is running on http://{}", config.api.bind);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config().await?;
    let monitor = Arc::new(Monitor::new(config.status.services.clone())?);

    tokio::select! {
        t = start_api(config, monitor.clone()) => t?,
        t = monitor::start(monitor) => t?,
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
