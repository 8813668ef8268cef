//! Share-link authentication.
//!
//! A share grants access to one item without a user account. Logging in with
//! a share runs through three steps, each in its own module:
//!
//! 1. [`verifier`] checks the share's validity window, quota and password
//! 2. [`ledger`] counts the use and sweeps expired sessions
//! 3. [`issuer`] signs an access token and persists a refresh session
//!
//! [`Shares::login`] strings them together; the ledger and issuer writes of
//! one login commit or roll back together. Invitations and share creation
//! live beside them on [`Shares`].

mod error;
mod invite;
pub mod issuer;
pub mod ledger;
mod login;
mod registry;
pub mod verifier;

use std::sync::Arc;
use std::time::Duration;

use common::prelude::{RefreshToken, SigningKey};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::AccessChecker;
use crate::database::Database;
use crate::directory::UserDirectory;
use crate::mail::Mailer;
use crate::service_config::AuthConfig;

pub use error::ShareError;
pub use invite::{compose_invitation, INVITATION_SUBJECT};
pub use issuer::TokenIssuer;
pub use registry::{NewShare, ShareInfo};

/// What a caller presents to log in with a share
#[derive(Debug, Clone, Deserialize)]
pub struct ShareCredentials {
    pub share: Uuid,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request provenance copied onto the session, never validated
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: RefreshToken,
    /// lifetime of `access_token`
    pub expires_in: Duration,
}

/// Share operations over a database and the collaborators they need
#[derive(Clone)]
pub struct Shares {
    db: Database,
    config: Arc<AuthConfig>,
    issuer: TokenIssuer,
    access: Arc<dyn AccessChecker>,
    mailer: Arc<dyn Mailer>,
    directory: Arc<dyn UserDirectory>,
}

impl Shares {
    pub fn new(
        db: Database,
        config: AuthConfig,
        access: Arc<dyn AccessChecker>,
        mailer: Arc<dyn Mailer>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self {
            db,
            config: Arc::new(config),
            issuer,
            access,
            mailer,
            directory,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Key for validating access tokens this service issued
    pub fn signing_key(&self) -> &SigningKey {
        self.issuer.signing_key()
    }
}

impl std::fmt::Debug for Shares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shares")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
