use clap::Args;

use sharegate_daemon::state::{AppState, StateError};
use sharegate_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Use an in-memory database instead of db.sqlite
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("can't start daemon: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        // Secret file + SHAREGATE_* overrides; a missing secret stops here
        let auth = state.auth_config()?;

        let config = ServiceConfig {
            api_port: self.api_port.unwrap_or(state.config.api_port),
            sqlite_path: (!self.ephemeral).then(|| state.db_path.clone()),
            log_level: tracing::Level::INFO,
            log_dir: self.log_dir.clone(),
            auth,
            admin_token: state.config.admin_token.clone(),
            operator: state.config.operator.clone(),
            mailer: state.config.mailer.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon stopped".to_string())
    }
}
