use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::Provenance;
use crate::shares::{ShareCredentials, ShareError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct AuthRequest {
    /// Id of the share to log in with
    #[arg(long)]
    pub share: Uuid,
    /// Share password, if it has one
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// access token lifetime in seconds
    pub expires_in: u64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Provenance(context): Provenance,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ShareError> {
    // A body that doesn't name a share (a malformed id included) fails like
    // any other login
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(ip = ?context.ip, "unreadable share login: {}", e.body_text());
        ShareError::InvalidCredentials
    })?;
    let credentials = ShareCredentials {
        share: req.share,
        password: req.password,
    };
    let tokens = state.shares().login(&credentials, &context).await?;

    Ok(Json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.into_inner(),
        expires_in: tokens.expires_in.as_secs(),
    }))
}

impl ApiRequest for AuthRequest {
    type Response = AuthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/shares/auth")?;
        Ok(client.post(full_url).json(&self))
    }
}
