pub mod models;
mod sqlite;
pub mod types;

use std::ops::Deref;

use sqlx::SqlitePool;

pub use models::{NewShareRecord, Session, Share};

pub type DatabaseConnection = sqlx::SqliteConnection;

/// Migrated SQLite pool holding shares and sessions
#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Open and migrate the database behind a `sqlite:` URL
    pub async fn connect(url: &url::Url) -> Result<Self, DatabaseSetupError> {
        match url.scheme() {
            "sqlite" => {
                let pool = sqlite::connect_sqlite(url).await?;
                sqlite::migrate_sqlite(&pool).await?;
                Ok(Self(pool))
            }
            other => Err(DatabaseSetupError::UnknownDbType(other.to_string())),
        }
    }

    /// Wrap an existing pool; the caller is responsible for migrations
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.0).await.map(|_| ())
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &SqlitePool {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("database migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("database unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("unsupported database scheme: {0}")]
    UnknownDbType(String),
}
