#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ::common::prelude::SigningSecret;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use sharegate_daemon::access::{AccessChecker, AccessError, Accountability, Action, OperatorPolicy};
use sharegate_daemon::database::{Database, Session};
use sharegate_daemon::directory::{StaticDirectory, UserProfile};
use sharegate_daemon::mail::{MailError, MailMessage, Mailer};
use sharegate_daemon::service_config::AuthConfig;
use sharegate_daemon::shares::{NewShare, ShareInfo, Shares};

pub const PUBLIC_URL: &str = "https://cms.example.com";

/// Mailer that keeps every message in memory
#[derive(Default)]
pub struct Outbox(Mutex<Vec<MailMessage>>);

impl Outbox {
    pub fn messages(&self) -> Vec<MailMessage> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.0.lock().unwrap().push(message);
        Ok(())
    }
}

/// Policy that refuses everything, even admins
pub struct DenyAll;

#[async_trait]
impl AccessChecker for DenyAll {
    async fn check_access(
        &self,
        _accountability: &Accountability,
        action: Action,
        collection: &str,
        item: &str,
    ) -> Result<(), AccessError> {
        Err(AccessError::Forbidden {
            action,
            collection: collection.to_string(),
            item: item.to_string(),
        })
    }
}

pub struct Harness {
    pub shares: Shares,
    pub outbox: Arc<Outbox>,
    pub operator: UserProfile,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_access(Arc::new(OperatorPolicy)).await
    }

    pub async fn with_access(access: Arc<dyn AccessChecker>) -> Self {
        Self::build(access, auth_config()).await
    }

    /// Operator policy with hand-tuned auth settings
    pub async fn with_auth(config: AuthConfig) -> Self {
        Self::build(Arc::new(OperatorPolicy), config).await
    }

    async fn build(access: Arc<dyn AccessChecker>, config: AuthConfig) -> Self {
        let db = Database::connect(&Url::parse("sqlite::memory:").unwrap())
            .await
            .unwrap();
        let operator = UserProfile {
            id: Uuid::new_v4(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
        };
        let outbox = Arc::new(Outbox::default());
        let shares = Shares::new(
            db,
            config,
            access,
            outbox.clone(),
            Arc::new(StaticDirectory::new([operator.clone()])),
        );

        Self {
            shares,
            outbox,
            operator,
        }
    }

    pub fn admin(&self) -> Accountability {
        Accountability::admin(self.operator.id)
    }

    pub fn db(&self) -> &Database {
        self.shares.database()
    }

    /// Create a share through the registry as the operator
    pub async fn share(&self, new_share: NewShare) -> ShareInfo {
        self.shares
            .create_share(&self.admin(), new_share)
            .await
            .unwrap()
    }

    /// Overwrite a share's use counter
    pub async fn set_times_used(&self, share: Uuid, times_used: i64) {
        sqlx::query("UPDATE shares SET times_used = ?1 WHERE id = ?2")
            .bind(times_used)
            .bind(share.to_string())
            .execute(&**self.db())
            .await
            .unwrap();
    }

    pub async fn insert_session(&self, token: &str, expires: OffsetDateTime, share: Option<Uuid>) {
        let mut conn = self.db().acquire().await.unwrap();
        Session::create(token, expires, None, None, share, &mut conn)
            .await
            .unwrap();
    }

    pub async fn session_count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&**self.db())
            .await
            .unwrap();
        count
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(
        SigningSecret::from_str("integration-test-secret").unwrap(),
        Url::parse(PUBLIC_URL).unwrap(),
    )
}

pub fn article(item: &str) -> NewShare {
    NewShare {
        collection: "articles".to_string(),
        item: item.to_string(),
        ..Default::default()
    }
}
