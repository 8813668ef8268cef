use common::prelude::ShareScope;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::types::{DTimestamp, DUuid};
use crate::database::{Database, DatabaseConnection};

const SHARE_COLUMNS: &str = r#"
    id, name, role, collection, item, date_start, date_end,
    max_uses, times_used, password, user_created, date_created
"#;

/// A persistent grant of time and usage bounded access to one item
///
/// `password` holds an Argon2 PHC hash, never plaintext. Use
/// [`ShareInfo`](crate::shares::ShareInfo) for anything leaving the process.
#[derive(Debug, Clone, FromRow)]
pub struct Share {
    pub id: DUuid,
    pub name: Option<String>,
    pub role: Option<DUuid>,
    pub collection: String,
    pub item: String,
    pub date_start: Option<DTimestamp>,
    pub date_end: Option<DTimestamp>,
    pub max_uses: Option<i64>,
    pub times_used: i64,
    pub password: Option<String>,
    pub user_created: Option<DUuid>,
    pub date_created: DTimestamp,
}

/// Column values for a share about to be inserted
#[derive(Debug, Clone, Default)]
pub struct NewShareRecord {
    pub name: Option<String>,
    pub role: Option<Uuid>,
    pub collection: String,
    pub item: String,
    pub date_start: Option<OffsetDateTime>,
    pub date_end: Option<OffsetDateTime>,
    pub max_uses: Option<i64>,
    /// Already hashed
    pub password: Option<String>,
    pub user_created: Option<Uuid>,
}

impl Share {
    pub fn scope(&self) -> ShareScope {
        ShareScope {
            item: self.item.clone(),
            collection: self.collection.clone(),
        }
    }

    /// Insert a new share with a zeroed use counter
    pub async fn create(record: &NewShareRecord, db: &Database) -> Result<Share, sqlx::Error> {
        let id = DUuid::generate();

        sqlx::query(
            r#"
            INSERT INTO shares (
                id, name, role, collection, item, date_start, date_end,
                max_uses, times_used, password, user_created, date_created
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10, ?11)
            "#,
        )
        .bind(id)
        .bind(record.name.as_deref())
        .bind(record.role.map(DUuid::from))
        .bind(&record.collection)
        .bind(&record.item)
        .bind(record.date_start.map(DTimestamp::from))
        .bind(record.date_end.map(DTimestamp::from))
        .bind(record.max_uses)
        .bind(record.password.as_deref())
        .bind(record.user_created.map(DUuid::from))
        .bind(DTimestamp::now())
        .execute(&**db)
        .await?;

        Self::get(*id, db).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a share by id, regardless of whether it is currently usable
    pub async fn get(id: Uuid, db: &Database) -> Result<Option<Share>, sqlx::Error> {
        let query = format!("SELECT {} FROM shares WHERE id = ?1", SHARE_COLUMNS);
        sqlx::query_as::<_, Share>(&query)
            .bind(DUuid::from(id))
            .fetch_optional(&**db)
            .await
    }

    /// Get a share only if its validity window contains `now` and it still
    /// has uses left.
    ///
    /// Both window bounds are inclusive; null bounds are open.
    pub async fn get_active(
        id: Uuid,
        now: OffsetDateTime,
        db: &Database,
    ) -> Result<Option<Share>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM shares
            WHERE id = ?1
              AND (date_end IS NULL OR date_end >= ?2)
              AND (date_start IS NULL OR date_start <= ?2)
              AND (max_uses IS NULL OR times_used < max_uses)
            "#,
            SHARE_COLUMNS
        );
        sqlx::query_as::<_, Share>(&query)
            .bind(DUuid::from(id))
            .bind(DTimestamp::from(now))
            .fetch_optional(&**db)
            .await
    }

    /// Count one use against the share's quota.
    ///
    /// The quota check and the increment are a single statement, so two
    /// concurrent logins can never both spend the last use. Returns `false`
    /// when no use was left.
    pub async fn increment_uses(
        id: Uuid,
        conn: &mut DatabaseConnection,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE shares
            SET times_used = times_used + 1
            WHERE id = ?1
              AND (max_uses IS NULL OR times_used < max_uses)
            "#,
        )
        .bind(DUuid::from(id))
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
