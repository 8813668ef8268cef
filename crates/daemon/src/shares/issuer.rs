use std::time::Duration;

use common::prelude::{AccessTokenClaims, RefreshToken, SigningKey};
use time::OffsetDateTime;

use super::{LoginTokens, RequestContext, ShareError};
use crate::database::{DatabaseConnection, Session, Share};
use crate::service_config::AuthConfig;

/// Mints the access / refresh token pair for a verified share
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: SigningKey::new(&config.signing_secret, config.issuer.clone()),
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Sign an access token for `share` and record a fresh refresh token as
    /// a session on `conn`.
    ///
    /// Callers own authorization; nothing here re-checks the share.
    pub async fn issue(
        &self,
        conn: &mut DatabaseConnection,
        share: &Share,
        context: &RequestContext,
        now: OffsetDateTime,
    ) -> Result<LoginTokens, ShareError> {
        let ttl_secs = i64::try_from(self.access_token_ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = AccessTokenClaims::for_share(
            *share.id,
            share.role.map(Into::into),
            share.scope(),
            self.key.issuer(),
            now.unix_timestamp(),
            ttl_secs,
        );
        let access_token = self.key.sign(&claims)?;

        let refresh_token = RefreshToken::generate()
            .map_err(|e| ShareError::Unavailable(format!("entropy source failed: {}", e)))?;
        let expires = time::Duration::try_from(self.refresh_token_ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                tracing::error!(ttl = ?self.refresh_token_ttl, "refresh token expiry out of range");
                ShareError::Unavailable("refresh token lifetime out of range".to_string())
            })?;

        Session::create(
            refresh_token.as_str(),
            expires,
            context.ip.as_deref(),
            context.user_agent.as_deref(),
            Some(*share.id),
            conn,
        )
        .await?;

        Ok(LoginTokens {
            access_token,
            refresh_token,
            expires_in: self.access_token_ttl,
        })
    }
}
