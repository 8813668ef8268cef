/**
 * Claims carried inside share access tokens.
 *  Only ever exists inside a signed token, never
 *  persisted.
 */
pub mod claims;
/**
 * Cryptographic types and operations.
 *  - Password hashing and verification
 *  - Refresh token generation
 *  - Access token signing and validation
 */
pub mod crypto;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::claims::{AccessTokenClaims, ShareScope};
    pub use crate::crypto::{RefreshToken, SigningKey, SigningSecret};
    pub use crate::version::BuildInfo;
}
