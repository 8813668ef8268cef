use std::path::PathBuf;
use std::time::Duration;

use common::prelude::SigningSecret;
use url::Url;

use crate::directory::UserProfile;

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);
/// Default refresh token (session) lifetime
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_ISSUER: &str = "sharegate";
/// Shortest token lifetime accepted from configuration
pub const MIN_TOKEN_TTL: Duration = Duration::from_secs(1);
/// Longest token lifetime accepted from configuration (ten years)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Process-wide settings for share logins and invitations.
///
/// Built once at startup and shared read-only; nothing in the share flow
/// reads the environment directly.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// key material for signing access tokens
    pub signing_secret: SigningSecret,
    /// `iss` claim written into and required from access tokens
    pub issuer: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// public base URL invitation links point at
    pub public_url: Url,
}

impl AuthConfig {
    pub fn new(signing_secret: SigningSecret, public_url: Url) -> Self {
        Self {
            signing_secret,
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            public_url,
        }
    }
}

/// Where invitation messages go
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MailerConfig {
    /// Write messages to the log (default)
    #[default]
    Log,
    /// POST messages as JSON to an HTTP relay
    Relay { url: Url },
}

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server.
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,

    // share auth
    pub auth: AuthConfig,
    /// Bearer token that grants operator (admin) accountability on the API.
    ///  if not set then share creation and invitations are unavailable
    pub admin_token: Option<String>,
    /// Identity behind the admin token, named in invitations
    pub operator: UserProfile,
    pub mailer: MailerConfig,
}
