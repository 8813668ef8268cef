use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;

use crate::database::Database;
use crate::ServiceState;

const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

/// A dependency that must answer before the service takes traffic
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), String>;
}

#[async_trait]
impl ReadinessProbe for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.ping().await.map_err(|e| e.to_string())
    }
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    probe(state.database()).await
}

async fn probe(dependency: &dyn ReadinessProbe) -> Response {
    let failure = match timeout(READINESS_TIMEOUT, dependency.check()).await {
        Ok(Ok(())) => {
            return (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
        }
        Ok(Err(e)) => {
            tracing::warn!(dependency = dependency.name(), "readiness check failed: {}", e);
            format!("{} isn't available", dependency.name())
        }
        Err(_) => format!("{} check timed out", dependency.name()),
    };

    let body = serde_json::json!({"status": "failure", "message": failure});
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<(), String>);

    #[async_trait]
    impl ReadinessProbe for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn check(&self) -> Result<(), String> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_probe_status() {
        let response = probe(&Fixed(Ok(()))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = probe(&Fixed(Err("disk on fire".to_string()))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_in_memory_database_is_ready() {
        let db = Database::connect(&url::Url::parse("sqlite::memory:").unwrap())
            .await
            .unwrap();
        let response = probe(&db).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
