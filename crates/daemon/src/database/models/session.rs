use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::types::{DTimestamp, DUuid};
use crate::database::{Database, DatabaseConnection};

/// Server-side record backing a refresh token
///
/// Sessions are written once and never updated; they go away when the
/// expiry sweep finds them past `expires`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub expires: DTimestamp,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub share: Option<DUuid>,
}

impl Session {
    pub async fn create(
        token: &str,
        expires: OffsetDateTime,
        ip: Option<&str>,
        user_agent: Option<&str>,
        share: Option<Uuid>,
        conn: &mut DatabaseConnection,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, expires, ip, user_agent, share)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(token)
        .bind(DTimestamp::from(expires))
        .bind(ip)
        .bind(user_agent)
        .bind(share.map(DUuid::from))
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn get(token: &str, db: &Database) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT token, expires, ip, user_agent, share
            FROM sessions
            WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&**db)
        .await
    }

    /// All sessions minted through a given share, soonest expiry first
    pub async fn list_for_share(share: Uuid, db: &Database) -> Result<Vec<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT token, expires, ip, user_agent, share
            FROM sessions
            WHERE share = ?1
            ORDER BY expires ASC
            "#,
        )
        .bind(DUuid::from(share))
        .fetch_all(&**db)
        .await
    }

    /// Delete every session that expired strictly before `now`, across all shares
    pub async fn delete_expired(
        now: OffsetDateTime,
        conn: &mut DatabaseConnection,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires < ?1")
            .bind(DTimestamp::from(now))
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
