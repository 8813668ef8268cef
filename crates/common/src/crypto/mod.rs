//! Credential primitives for Sharegate
//!
//! This module provides everything a share login needs to prove and hand out
//! access:
//!
//! - **Password secrets**: Argon2id hashing in PHC string format, verified in
//!   constant time against what a caller supplies
//! - **Refresh tokens**: 64-character URL-safe random strings backed by the OS
//!   CSPRNG, stored server side as sessions
//! - **Access tokens**: HS256-signed JWTs carrying [`AccessTokenClaims`],
//!   stateless and validated without touching the database
//!
//! # Security Model
//!
//! ## Password protected shares
//! The plaintext password is never stored. Hashes are salted per share and
//! verification is slow by construction, so callers should run it off the
//! async executor.
//!
//! ## Token pair
//! A login returns a short-lived access token and a long-lived refresh token.
//! Only the refresh token has server-side state; revoking a share's sessions
//! does not invalidate access tokens already handed out.
//!
//! [`AccessTokenClaims`]: crate::claims::AccessTokenClaims

mod password;
mod refresh;
mod signing;

pub use password::{hash_password, verify_password, PasswordError};
pub use refresh::{RefreshToken, REFRESH_TOKEN_LEN};
pub use signing::{SigningKey, SigningSecret, TokenError, SIGNING_SECRET_SIZE};
