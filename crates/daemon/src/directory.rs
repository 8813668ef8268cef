//! User identity lookup, used to name the inviter in invitations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNKNOWN_USER: &str = "Unknown User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    /// Full name, then first name, then email, then a placeholder
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name, &self.email) {
            (Some(first), Some(last), _) => format!("{} {}", first, last),
            (Some(first), None, _) => first.clone(),
            (None, _, Some(email)) => email.clone(),
            _ => UNKNOWN_USER.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup(&self, id: Uuid) -> Result<Option<UserProfile>, DirectoryError>;
}

/// Directory backed by a fixed set of profiles from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory(HashMap<Uuid, UserProfile>);

impl StaticDirectory {
    pub fn new(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self(profiles.into_iter().map(|p| (p.id, p)).collect())
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn lookup(&self, id: Uuid) -> Result<Option<UserProfile>, DirectoryError> {
        Ok(self.0.get(&id).cloned())
    }
}
