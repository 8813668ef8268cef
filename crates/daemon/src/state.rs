use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, str::FromStr};

use common::prelude::SigningSecret;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::directory::UserProfile;
use crate::service_config::{
    AuthConfig, MailerConfig, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_ISSUER, DEFAULT_REFRESH_TOKEN_TTL,
    MAX_TOKEN_TTL, MIN_TOKEN_TTL,
};

pub const APP_NAME: &str = "sharegate";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const SECRET_FILE_NAME: &str = "secret.key";

pub const SECRET_ENV: &str = "SHAREGATE_SECRET";
pub const ACCESS_TOKEN_TTL_ENV: &str = "SHAREGATE_ACCESS_TOKEN_TTL";
pub const REFRESH_TOKEN_TTL_ENV: &str = "SHAREGATE_REFRESH_TOKEN_TTL";
pub const PUBLIC_URL_ENV: &str = "SHAREGATE_PUBLIC_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Base URL invitation links point at
    #[serde(default = "default_public_url")]
    pub public_url: Url,
    #[serde(default = "default_access_token_ttl", with = "humantime_str")]
    pub access_token_ttl: Duration,
    #[serde(default = "default_refresh_token_ttl", with = "humantime_str")]
    pub refresh_token_ttl: Duration,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Bearer token granting operator access to share management
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default = "default_operator")]
    pub operator: UserProfile,
    #[serde(default)]
    pub mailer: MailerConfig,
}

fn default_api_port() -> u16 {
    4000
}

fn default_public_url() -> Url {
    Url::parse("http://localhost:4000").expect("hardcoded URL must parse")
}

fn default_access_token_ttl() -> Duration {
    DEFAULT_ACCESS_TOKEN_TTL
}

fn default_refresh_token_ttl() -> Duration {
    DEFAULT_REFRESH_TOKEN_TTL
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_operator() -> UserProfile {
    UserProfile {
        id: Uuid::nil(),
        first_name: Some("Sharegate".to_string()),
        last_name: Some("Operator".to_string()),
        email: None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            public_url: default_public_url(),
            access_token_ttl: default_access_token_ttl(),
            refresh_token_ttl: default_refresh_token_ttl(),
            issuer: default_issuer(),
            admin_token: None,
            operator: default_operator(),
            mailer: MailerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults plus a fresh admin token and operator id, as written by `init`
    pub fn generate() -> Result<Self, StateError> {
        let admin_token =
            SigningSecret::generate().map_err(|e| StateError::InvalidSecret(e.to_string()))?;
        Ok(Self {
            admin_token: Some(admin_token.expose().to_string()),
            operator: UserProfile {
                id: Uuid::new_v4(),
                ..default_operator()
            },
            ..Self::default()
        })
    }

    /// Resolve the auth settings, letting `env` override the file.
    ///
    /// `env` is a variable lookup so callers (and tests) decide where
    /// overrides come from.
    pub fn auth_config<F>(
        &self,
        file_secret: Option<&str>,
        env: F,
    ) -> Result<AuthConfig, StateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_secret = env(SECRET_ENV)
            .or_else(|| file_secret.map(str::to_string))
            .ok_or(StateError::MissingSecret)?;
        let signing_secret = SigningSecret::from_str(&raw_secret)
            .map_err(|e| StateError::InvalidSecret(e.to_string()))?;

        let access_token_ttl = resolve_ttl(
            "access_token_ttl",
            self.access_token_ttl,
            ACCESS_TOKEN_TTL_ENV,
            &env,
        )?;
        let refresh_token_ttl = resolve_ttl(
            "refresh_token_ttl",
            self.refresh_token_ttl,
            REFRESH_TOKEN_TTL_ENV,
            &env,
        )?;
        let public_url = match env(PUBLIC_URL_ENV) {
            Some(raw) => Url::parse(&raw).map_err(|e| StateError::InvalidEnv {
                var: PUBLIC_URL_ENV,
                reason: e.to_string(),
            })?,
            None => self.public_url.clone(),
        };

        Ok(AuthConfig {
            signing_secret,
            issuer: self.issuer.clone(),
            access_token_ttl,
            refresh_token_ttl,
            public_url,
        })
    }
}

/// The file value of a TTL, or its environment override, held to
/// [`MIN_TOKEN_TTL`]..=[`MAX_TOKEN_TTL`]
fn resolve_ttl<F>(
    setting: &'static str,
    from_file: Duration,
    var: &'static str,
    env: &F,
) -> Result<Duration, StateError>
where
    F: Fn(&str) -> Option<String>,
{
    let (source, ttl) = match env(var) {
        Some(raw) => {
            let ttl = humantime::parse_duration(raw.trim()).map_err(|e| {
                StateError::InvalidEnv {
                    var,
                    reason: e.to_string(),
                }
            })?;
            (var, ttl)
        }
        None => (setting, from_file),
    };

    if !(MIN_TOKEN_TTL..=MAX_TOKEN_TTL).contains(&ttl) {
        return Err(StateError::InvalidTtl {
            setting: source,
            reason: format!(
                "{} is outside {}..={}",
                humantime::format_duration(ttl),
                humantime::format_duration(MIN_TOKEN_TTL),
                humantime::format_duration(MAX_TOKEN_TTL)
            ),
        });
    }
    Ok(ttl)
}

/// Durations in config.toml are written the humantime way ("15m", "7days")
mod humantime_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.sharegate)
    pub state_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the signing secret
    pub secret_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.sharegate)
    pub fn state_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory with a fresh signing secret.
    ///
    /// When no config is given, [`AppConfig::generate`] supplies one.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if state_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = match config {
            Some(config) => config,
            None => AppConfig::generate()?,
        };

        fs::create_dir_all(&state_dir)?;

        let secret = SigningSecret::generate().map_err(|e| StateError::InvalidSecret(e.to_string()))?;
        let secret_path = state_dir.join(SECRET_FILE_NAME);
        write_private(&secret_path, secret.expose())?;

        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        write_private(&config_path, &config_toml)?;

        // The service creates the schema on first start
        let db_path = state_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            state_dir,
            db_path,
            secret_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if !state_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = state_dir.join(DB_FILE_NAME);
        let secret_path = state_dir.join(SECRET_FILE_NAME);
        let config_path = state_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            state_dir,
            db_path,
            secret_path,
            config_path,
            config,
        })
    }

    /// Read the signing secret file, if there is one
    pub fn read_secret(&self) -> Result<Option<String>, StateError> {
        if !self.secret_path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.secret_path)?))
    }

    /// Auth settings from the secret file, config and process environment
    pub fn auth_config(&self) -> Result<AuthConfig, StateError> {
        let file_secret = self.read_secret()?;
        self.config
            .auth_config(file_secret.as_deref(), |var| std::env::var(var).ok())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> Result<(), StateError> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, contents)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> Result<(), StateError> {
    fs::write(path, contents)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("sharegate directory not initialized. Run 'sharegate init' first")]
    NotInitialized,

    #[error("sharegate directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("no signing secret: set SHAREGATE_SECRET or run 'sharegate init'")]
    MissingSecret,

    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error("{setting} out of range: {reason}")]
    InvalidTtl {
        setting: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_init_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("state");

        let state = AppState::init(Some(dir.clone()), None).unwrap();
        assert!(state.secret_path.exists());
        assert!(state.db_path.exists());
        assert!(state.config.admin_token.is_some());
        assert!(!state.config.operator.id.is_nil());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config.api_port, 4000);
        assert_eq!(loaded.config.admin_token, state.config.admin_token);
        assert_eq!(loaded.config.operator, state.config.operator);
        assert_eq!(loaded.config.access_token_ttl, Duration::from_secs(900));
        assert_eq!(
            loaded.config.refresh_token_ttl,
            Duration::from_secs(7 * 24 * 3600)
        );

        let secret = loaded.read_secret().unwrap().unwrap();
        assert!(!secret.trim().is_empty());

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(tmp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_config_parses_humantime_durations() {
        let config: AppConfig = toml::from_str(
            r#"
            api_port = 4100
            access_token_ttl = "5m"
            refresh_token_ttl = "1day"

            [mailer]
            type = "relay"
            url = "http://mail.local/send"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_port, 4100);
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.issuer, "sharegate");
        assert!(matches!(config.mailer, MailerConfig::Relay { .. }));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = AppConfig::default();
        let auth = config
            .auth_config(
                Some("from-file"),
                env_from(&[
                    (SECRET_ENV, "from-env"),
                    (ACCESS_TOKEN_TTL_ENV, "1m"),
                    (PUBLIC_URL_ENV, "https://share.example.com"),
                ]),
            )
            .unwrap();

        assert_eq!(auth.signing_secret.expose(), "from-env");
        assert_eq!(auth.access_token_ttl, Duration::from_secs(60));
        assert_eq!(auth.refresh_token_ttl, config.refresh_token_ttl);
        assert_eq!(auth.public_url.as_str(), "https://share.example.com/");
    }

    #[test]
    fn test_missing_or_empty_secret_is_an_error() {
        let config = AppConfig::default();
        assert!(matches!(
            config.auth_config(None, env_from(&[])),
            Err(StateError::MissingSecret)
        ));
        assert!(matches!(
            config.auth_config(Some("\n"), env_from(&[])),
            Err(StateError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_bad_ttl_override() {
        let config = AppConfig::default();
        let result = config.auth_config(
            Some("secret"),
            env_from(&[(REFRESH_TOKEN_TTL_ENV, "forever")]),
        );
        assert!(matches!(
            result,
            Err(StateError::InvalidEnv {
                var: REFRESH_TOKEN_TTL_ENV,
                ..
            })
        ));
    }

    #[test]
    fn test_ttl_bounds_apply_to_file_and_env() {
        let config: AppConfig = toml::from_str(
            r#"
            access_token_ttl = "0s"
            refresh_token_ttl = "100000years"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.auth_config(Some("secret"), env_from(&[])),
            Err(StateError::InvalidTtl {
                setting: "access_token_ttl",
                ..
            })
        ));

        let config = AppConfig {
            access_token_ttl: Duration::from_secs(60),
            ..config
        };
        assert!(matches!(
            config.auth_config(Some("secret"), env_from(&[])),
            Err(StateError::InvalidTtl {
                setting: "refresh_token_ttl",
                ..
            })
        ));

        // a sane override rescues an out-of-range file value
        let auth = config
            .auth_config(Some("secret"), env_from(&[(REFRESH_TOKEN_TTL_ENV, "30days")]))
            .unwrap();
        assert_eq!(auth.refresh_token_ttl, Duration::from_secs(30 * 86_400));

        for raw in ["0s", "11years"] {
            let result = AppConfig::default()
                .auth_config(Some("secret"), env_from(&[(ACCESS_TOKEN_TTL_ENV, raw)]));
            assert!(
                matches!(
                    result,
                    Err(StateError::InvalidTtl {
                        setting: ACCESS_TOKEN_TTL_ENV,
                        ..
                    })
                ),
                "{} should be rejected",
                raw
            );
        }

        let at_limits = AppConfig {
            access_token_ttl: MIN_TOKEN_TTL,
            refresh_token_ttl: MAX_TOKEN_TTL,
            ..AppConfig::default()
        };
        assert!(at_limits.auth_config(Some("secret"), env_from(&[])).is_ok());
    }
}
