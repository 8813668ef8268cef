use clap::Args;
use url::Url;

use sharegate_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 4000)]
    pub api_port: u16,

    /// Public base URL used in invitation links (default: http://localhost:<api_port>)
    #[arg(long)]
    pub public_url: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
    #[error("invalid public url: {0}")]
    PublicUrl(#[from] url::ParseError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let public_url = match &self.public_url {
            Some(url) => url.clone(),
            None => Url::parse(&format!("http://localhost:{}", self.api_port))?,
        };

        let config = AppConfig {
            api_port: self.api_port,
            public_url,
            ..AppConfig::generate()?
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized sharegate directory at: {}\n\
             - Database: {}\n\
             - Signing secret: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Public URL: {}\n\
             - Admin token: {}",
            state.state_dir.display(),
            state.db_path.display(),
            state.secret_path.display(),
            state.config_path.display(),
            state.config.api_port,
            state.config.public_url,
            state.config.admin_token.as_deref().unwrap_or("<none>"),
        );

        Ok(output)
    }
}
