//! Access token signing using HS256 JWTs
//!
//! The wire format is the usual `header.payload.signature` triple. Tokens
//! are validated for signature, expiry and issuer; there is no revocation
//! list.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::AccessTokenClaims;

/// Random bytes behind a generated signing secret (256 bits)
pub const SIGNING_SECRET_SIZE: usize = 32;

/// Errors that can occur while minting or checking access tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("failed to generate signing secret: {0}")]
    Random(#[from] getrandom::Error),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Process-wide secret used to sign access tokens
///
/// Secrets are arbitrary non-empty strings so they can be supplied through
/// the environment; [`SigningSecret::generate`] produces a base64url one.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Generate a new random secret using a cryptographically secure RNG
    pub fn generate() -> Result<Self, TokenError> {
        let mut buff = [0u8; SIGNING_SECRET_SIZE];
        getrandom::getrandom(&mut buff)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(buff)))
    }

    /// The secret as stored on disk / in the environment
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for SigningSecret {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}

/// Signs and validates access tokens for a single issuer
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
}

impl SigningKey {
    pub fn new(secret: &SigningSecret, issuer: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.bytes()),
            decoding: DecodingKey::from_secret(secret.bytes()),
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign `claims` into a compact JWT
    pub fn sign(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        Ok(token)
    }

    /// Validate a token's signature, expiry and issuer and return its claims
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        let data = jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use uuid::Uuid;

    use super::*;
    use crate::claims::ShareScope;

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    fn claims(issuer: &str, iat: i64, ttl: i64) -> AccessTokenClaims {
        AccessTokenClaims::for_share(
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            ShareScope {
                item: "1".to_string(),
                collection: "articles".to_string(),
            },
            issuer,
            iat,
            ttl,
        )
    }

    #[test]
    fn test_sign_and_verify() {
        let secret = SigningSecret::generate().unwrap();
        let key = SigningKey::new(&secret, "sharegate");
        let claims = claims("sharegate", now(), 900);

        let token = key.sign(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = key.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let key = SigningKey::new(&SigningSecret::generate().unwrap(), "sharegate");
        let other = SigningKey::new(&SigningSecret::generate().unwrap(), "sharegate");

        let token = key.sign(&claims("sharegate", now(), 900)).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let key = SigningKey::new(&SigningSecret::generate().unwrap(), "sharegate");
        let token = key.sign(&claims("sharegate", now(), 900)).unwrap();

        let mut forged = claims("sharegate", now(), 900);
        forged.admin_access = true;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(key.verify(&tampered).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let key = SigningKey::new(&SigningSecret::generate().unwrap(), "sharegate");
        // Well past the default validation leeway
        let token = key.sign(&claims("sharegate", now() - 3_600, 60)).unwrap();
        assert!(key.verify(&token).is_err());
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let secret = SigningSecret::generate().unwrap();
        let key = SigningKey::new(&secret, "sharegate");
        let token = key.sign(&claims("someone-else", now(), 900)).unwrap();
        assert!(key.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            "   ".parse::<SigningSecret>(),
            Err(TokenError::EmptySecret)
        ));
        let secret: SigningSecret = "s3cret".parse().unwrap();
        assert_eq!(secret.expose(), "s3cret");
        assert!(!format!("{:?}", secret).contains("s3cret"));
    }
}
