use common::crypto::verify_password;
use time::OffsetDateTime;
use uuid::Uuid;

use super::ShareError;
use crate::database::{Database, Share};

/// Check a share id (and password) against the share's window, quota and
/// secret.
///
/// Read-only. Argon2 verification runs on the blocking pool so it cannot
/// stall other requests on the runtime.
pub async fn verify(
    db: &Database,
    share_id: Uuid,
    password: Option<&str>,
    now: OffsetDateTime,
) -> Result<Share, ShareError> {
    let share = Share::get_active(share_id, now, db)
        .await?
        .ok_or(ShareError::InvalidCredentials)?;

    let Some(hash) = share.password.clone() else {
        return Ok(share);
    };
    let Some(supplied) = password.map(str::to_owned) else {
        return Err(ShareError::InvalidCredentials);
    };

    let outcome = tokio::task::spawn_blocking(move || verify_password(&supplied, &hash)).await?;
    match outcome {
        Ok(true) => Ok(share),
        Ok(false) => Err(ShareError::InvalidCredentials),
        Err(e) => {
            tracing::warn!(share = %share.id, "stored share password is unusable: {}", e);
            Err(ShareError::InvalidCredentials)
        }
    }
}
