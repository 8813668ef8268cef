use std::sync::Arc;

use url::Url;

use crate::access::{Accountability, OperatorPolicy};
use crate::database::{Database, DatabaseSetupError};
use crate::directory::{StaticDirectory, UserProfile};
use crate::mail::{LogMailer, MailError, Mailer, RelayMailer};
use crate::service_config::{Config, MailerConfig};
use crate::shares::Shares;

/// Main service state, shared by every request handler
#[derive(Clone)]
pub struct State {
    shares: Shares,
    admin_token: Option<Arc<str>>,
    operator: Arc<UserProfile>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup collaborators
        let mailer: Arc<dyn Mailer> = match &config.mailer {
            MailerConfig::Log => Arc::new(LogMailer),
            MailerConfig::Relay { url } => Arc::new(RelayMailer::new(url.clone())?),
        };
        let directory = Arc::new(StaticDirectory::new([config.operator.clone()]));

        if config.admin_token.is_none() {
            tracing::warn!("no admin token configured, share management is disabled");
        }

        Ok(Self::new(
            Shares::new(
                database,
                config.auth.clone(),
                Arc::new(OperatorPolicy),
                mailer,
                directory,
            ),
            config.admin_token.clone(),
            config.operator.clone(),
        ))
    }

    pub fn new(shares: Shares, admin_token: Option<String>, operator: UserProfile) -> Self {
        Self {
            shares,
            admin_token: admin_token.map(Into::into),
            operator: Arc::new(operator),
        }
    }

    pub fn shares(&self) -> &Shares {
        &self.shares
    }

    pub fn database(&self) -> &Database {
        self.shares.database()
    }

    pub fn operator(&self) -> &UserProfile {
        &self.operator
    }

    /// Who a request acts as, given the bearer token it presented
    pub fn accountability(&self, bearer: Option<&str>) -> Accountability {
        match (self.admin_token.as_deref(), bearer) {
            (Some(expected), Some(presented)) if constant_time_eq(expected, presented) => {
                Accountability::admin(self.operator.id)
            }
            _ => Accountability::anonymous(),
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

impl AsRef<Shares> for State {
    fn as_ref(&self) -> &Shares {
        &self.shares
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Mailer setup error: {0}")]
    Mailer(#[from] MailError),
}
