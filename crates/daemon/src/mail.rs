//! Outbound messaging for invitations.
//!
//! The service only composes messages; delivery belongs to a [`Mailer`].
//! Two are provided: [`LogMailer`] writes messages to the log, and
//! [`RelayMailer`] hands them to an HTTP relay as JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected message with status {0}")]
    Rejected(http::StatusCode),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            bytes = message.html.len(),
            "mail dispatched to log"
        );
        tracing::debug!(html = %message.html, "mail body");
        Ok(())
    }
}

/// Posts each message as JSON to a relay endpoint
#[derive(Debug, Clone)]
pub struct RelayMailer {
    client: reqwest::Client,
    url: Url,
}

impl RelayMailer {
    pub fn new(url: Url) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(to = %message.to, %status, "mail relay rejected message");
            return Err(MailError::Rejected(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use http::StatusCode;

    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            to: "bob@example.com".to_string(),
            subject: "hello".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    /// Local relay answering every POST with `status`, keeping what it received
    async fn relay(status: StatusCode) -> (Url, Arc<Mutex<Vec<MailMessage>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/send",
                post(
                    move |State(inbox): State<Arc<Mutex<Vec<MailMessage>>>>,
                          Json(msg): Json<MailMessage>| async move {
                        inbox.lock().unwrap().push(msg);
                        status
                    },
                ),
            )
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = Url::parse(&format!("http://{}/send", addr)).unwrap();
        (url, received)
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        LogMailer.send(message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_relay_posts_json() {
        let (url, received) = relay(StatusCode::ACCEPTED).await;
        RelayMailer::new(url).unwrap().send(message()).await.unwrap();
        assert_eq!(received.lock().unwrap().as_slice(), &[message()]);
    }

    #[tokio::test]
    async fn test_relay_rejection() {
        let (url, _) = relay(StatusCode::BAD_GATEWAY).await;
        let err = RelayMailer::new(url)
            .unwrap()
            .send(message())
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Rejected(StatusCode::BAD_GATEWAY)));
    }
}
