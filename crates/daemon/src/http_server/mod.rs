use std::net::SocketAddr;

use axum::Router;
use tokio::sync::watch;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

pub mod api;
mod extract;
mod handlers;
mod health;

pub use extract::{Caller, Provenance};

use crate::ServiceState;

/// Listener settings for the share API
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// level completed requests are traced at
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
        }
    }

    pub fn with_log_level(mut self, log_level: tracing::Level) -> Self {
        self.log_level = log_level;
        self
    }
}

fn request_tracing(
    level: tracing::Level,
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    let on_response = DefaultOnResponse::new()
        .level(level)
        .include_headers(false)
        .latency_unit(LatencyUnit::Micros);

    TraceLayer::new_for_http()
        .on_response(on_response)
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros))
}

/// `/_status` probes, `/api` routes and a 404 for everything else
pub fn router(config: &Config, state: ServiceState) -> Router {
    Router::new()
        .nest("/_status", health::router(state.clone()))
        .nest("/api", api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(request_tracing(config.log_level))
}

/// Serve until `shutdown` changes, then drain open connections
pub async fn run_api(
    config: Config,
    state: ServiceState,
    mut shutdown: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let app = router(&config, state).into_make_service_with_connect_info::<SocketAddr>();
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("http server failed: {0}")]
    Io(#[from] std::io::Error),
}
