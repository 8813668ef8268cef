use time::OffsetDateTime;

use super::{ledger, verifier, LoginTokens, RequestContext, ShareCredentials, ShareError, Shares};

impl Shares {
    /// Log in with a share id (and password, if the share has one).
    ///
    /// Verification happens before anything is written. The use counter,
    /// the new session and the expired-session sweep then commit as one
    /// transaction; tokens are only returned once that commit succeeded.
    /// Not idempotent: every successful call spends a use and creates a
    /// session.
    pub async fn login(
        &self,
        credentials: &ShareCredentials,
        context: &RequestContext,
    ) -> Result<LoginTokens, ShareError> {
        let now = OffsetDateTime::now_utc();

        let share = match verifier::verify(
            &self.db,
            credentials.share,
            credentials.password.as_deref(),
            now,
        )
        .await
        {
            Ok(share) => share,
            Err(ShareError::InvalidCredentials) => {
                tracing::warn!(ip = ?context.ip, "share login rejected");
                return Err(ShareError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let mut tx = self.db.begin().await?;
        ledger::record_use(&mut tx, &share).await?;
        let tokens = self.issuer.issue(&mut tx, &share, context, now).await?;
        let swept = ledger::sweep_expired(&mut tx, now).await?;
        tx.commit().await?;

        tracing::info!(share = %share.id, swept, "share login succeeded");
        Ok(tokens)
    }
}
