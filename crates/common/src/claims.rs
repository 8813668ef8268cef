use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single resource a share grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareScope {
    pub item: String,
    pub collection: String,
}

/// Claims embedded in every access token minted for a share login.
///
/// Share holders never get app or admin access; everything they may do is
/// bounded by `role` and `share_scope`. `iss`, `iat` and `exp` are the
/// standard registered claims (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub app_access: bool,
    pub admin_access: bool,
    pub role: Option<Uuid>,
    pub share: Uuid,
    pub share_scope: ShareScope,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Build the claims for a share login issued at `iat`, valid for `ttl_secs`.
    pub fn for_share(
        share: Uuid,
        role: Option<Uuid>,
        share_scope: ShareScope,
        issuer: &str,
        iat: i64,
        ttl_secs: i64,
    ) -> Self {
        Self {
            app_access: false,
            admin_access: false,
            role,
            share,
            share_scope,
            iss: issuer.to_string(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }
}
