use time::OffsetDateTime;

use super::ShareError;
use crate::database::{DatabaseConnection, Session, Share};

/// Count one successful login against `share`.
///
/// The increment is conditional on the quota still having room at write
/// time. If a concurrent login spent the last use between verification and
/// now, this login is refused like any other credential failure.
pub async fn record_use(conn: &mut DatabaseConnection, share: &Share) -> Result<(), ShareError> {
    if !Share::increment_uses(*share.id, conn).await? {
        tracing::warn!(share = %share.id, "share quota spent by a concurrent login");
        return Err(ShareError::InvalidCredentials);
    }
    Ok(())
}

/// Remove every session past its expiry, whichever share (or user) it
/// belongs to.
pub async fn sweep_expired(
    conn: &mut DatabaseConnection,
    now: OffsetDateTime,
) -> Result<u64, ShareError> {
    let removed = Session::delete_expired(now, conn).await?;
    if removed > 0 {
        tracing::debug!(removed, "swept expired sessions");
    }
    Ok(removed)
}
