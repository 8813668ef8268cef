use common::crypto::hash_password;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{ShareError, Shares};
use crate::access::{Accountability, Action};
use crate::database::{NewShareRecord, Share};

/// A share as requested by its creator; `password` is plaintext here
#[derive(Debug, Clone, Default)]
pub struct NewShare {
    pub name: Option<String>,
    pub role: Option<Uuid>,
    pub collection: String,
    pub item: String,
    pub password: Option<String>,
    pub date_start: Option<OffsetDateTime>,
    pub date_end: Option<OffsetDateTime>,
    pub max_uses: Option<i64>,
}

/// Public view of a share. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub role: Option<Uuid>,
    pub collection: String,
    pub item: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub date_start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub date_end: Option<OffsetDateTime>,
    pub max_uses: Option<i64>,
    pub times_used: i64,
    pub password_protected: bool,
}

impl From<&Share> for ShareInfo {
    fn from(share: &Share) -> Self {
        Self {
            id: *share.id,
            name: share.name.clone(),
            role: share.role.map(Into::into),
            collection: share.collection.clone(),
            item: share.item.clone(),
            date_start: share.date_start.map(Into::into),
            date_end: share.date_end.map(Into::into),
            max_uses: share.max_uses,
            times_used: share.times_used,
            password_protected: share.password.is_some(),
        }
    }
}

impl NewShare {
    fn validate(&self) -> Result<(), ShareError> {
        if self.collection.trim().is_empty() || self.item.trim().is_empty() {
            return Err(ShareError::Invalid(
                "collection and item are required".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            if start > end {
                return Err(ShareError::Invalid(
                    "date_start must not be after date_end".to_string(),
                ));
            }
        }
        if matches!(self.max_uses, Some(n) if n < 0) {
            return Err(ShareError::Invalid(
                "max_uses must not be negative".to_string(),
            ));
        }
        if matches!(self.password.as_deref(), Some("")) {
            return Err(ShareError::Invalid("password must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Shares {
    /// Create a share on behalf of `accountability`.
    ///
    /// The caller must be allowed to share the target item. A supplied
    /// password is hashed before it reaches storage.
    pub async fn create_share(
        &self,
        accountability: &Accountability,
        new_share: NewShare,
    ) -> Result<ShareInfo, ShareError> {
        if accountability.is_anonymous() {
            return Err(ShareError::Forbidden);
        }
        self.access
            .check_access(
                accountability,
                Action::Share,
                &new_share.collection,
                &new_share.item,
            )
            .await?;
        new_share.validate()?;

        let password = match new_share.password {
            Some(plain) => Some(
                tokio::task::spawn_blocking(move || hash_password(&plain))
                    .await?
                    .map_err(|e| ShareError::Unavailable(e.to_string()))?,
            ),
            None => None,
        };

        let record = NewShareRecord {
            name: new_share.name,
            role: new_share.role,
            collection: new_share.collection,
            item: new_share.item,
            date_start: new_share.date_start,
            date_end: new_share.date_end,
            max_uses: new_share.max_uses,
            password,
            user_created: accountability.user,
        };
        let share = Share::create(&record, &self.db).await?;

        tracing::info!(
            share = %share.id,
            collection = %share.collection,
            item = %share.item,
            "share created"
        );
        Ok(ShareInfo::from(&share))
    }

    /// Public information about a share, for rendering a login prompt
    pub async fn share_info(&self, share_id: Uuid) -> Result<ShareInfo, ShareError> {
        let share = Share::get(share_id, &self.db)
            .await?
            .ok_or(ShareError::NotFound)?;
        Ok(ShareInfo::from(&share))
    }
}
