use std::fmt;
use std::ops::Deref;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Length of an encoded refresh token in characters
pub const REFRESH_TOKEN_LEN: usize = 64;
/// Random bytes behind a refresh token (48 bytes encode to exactly 64 base64 chars)
const REFRESH_TOKEN_BYTES: usize = REFRESH_TOKEN_LEN / 4 * 3;

/// An opaque, URL-safe refresh credential
///
/// Refresh tokens carry no information about the share they were minted
/// for; the server-side session row is the only link back.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Generate a new random token from the OS CSPRNG
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut buff = [0u8; REFRESH_TOKEN_BYTES];
        getrandom::getrandom(&mut buff)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(buff)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for RefreshToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for RefreshToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// Tokens are bearer credentials; keep them out of debug output.
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"<redacted>").finish()
    }
}
