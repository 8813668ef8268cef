//! Authorization seam for share management.
//!
//! Share login never consults this module; only the operations that act on
//! behalf of a caller (creating shares, sending invitations) do.

use async_trait::async_trait;
use uuid::Uuid;

/// Collection name shares are exposed under for access checks
pub const SHARES_COLLECTION: &str = "shares";

/// Who a request acts as
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accountability {
    pub user: Option<Uuid>,
    pub role: Option<Uuid>,
    pub admin: bool,
}

impl Accountability {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn admin(user: Uuid) -> Self {
        Self {
            user: Some(user),
            role: None,
            admin: true,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Share,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Read => write!(f, "read"),
            Action::Share => write!(f, "share"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("not allowed to {action} {collection}/{item}")]
    Forbidden {
        action: Action,
        collection: String,
        item: String,
    },
    #[error("access check unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AccessChecker: Send + Sync {
    /// Fail unless `accountability` may perform `action` on the item
    async fn check_access(
        &self,
        accountability: &Accountability,
        action: Action,
        collection: &str,
        item: &str,
    ) -> Result<(), AccessError>;
}

/// Single-operator policy: admins may do anything, nobody else may do anything
#[derive(Debug, Clone, Default)]
pub struct OperatorPolicy;

#[async_trait]
impl AccessChecker for OperatorPolicy {
    async fn check_access(
        &self,
        accountability: &Accountability,
        action: Action,
        collection: &str,
        item: &str,
    ) -> Result<(), AccessError> {
        if accountability.admin && !accountability.is_anonymous() {
            return Ok(());
        }
        tracing::debug!(?accountability, %action, collection, item, "access denied");
        Err(AccessError::Forbidden {
            action,
            collection: collection.to_string(),
            item: item.to_string(),
        })
    }
}
