mod logging;
mod shutdown;

use std::net::SocketAddr;

pub use shutdown::ShutdownHandle;

use crate::http_server;
use crate::service_state::StateSetupError;
use crate::{ServiceConfig, ServiceState};

/// Build the service state and start the API server in the background.
///
/// Logging is left to the caller, which lets tests and embedders keep
/// their own subscriber.
pub async fn start_service(
    config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), ServiceError> {
    let (mut handle, shutdown_rx) = ShutdownHandle::install()?;
    let state = ServiceState::from_config(config).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let server_state = state.clone();
    handle.track(tokio::spawn(async move {
        let server = http_server::Config::new(addr);
        if let Err(e) = http_server::run_api(server, server_state, shutdown_rx).await {
            tracing::error!("api server stopped: {}", e);
        }
    }));

    tracing::info!(port = config.api_port, "share api started");
    Ok((state, handle))
}

/// Run the daemon in the foreground until a signal stops it
pub async fn spawn_service(config: &ServiceConfig) {
    let _logs = logging::init(config);

    match start_service(config).await {
        Ok((_, handle)) => handle.wait().await,
        Err(e) => {
            tracing::error!("daemon failed to start: {}", e);
            std::process::exit(3);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
    #[error("error creating server state: {0}")]
    State(#[from] StateSetupError),
}
