use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::Caller;
use crate::shares::ShareError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct InviteRequest {
    /// Id of the share to invite people to
    #[arg(long)]
    pub share: Uuid,
    /// Recipient address (repeatable)
    #[arg(long = "email", required = true)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    pub sent: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(accountability): Caller,
    payload: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<Json<InviteResponse>, ShareError> {
    let Json(req) = payload?;
    state
        .shares()
        .invite(&accountability, req.share, &req.emails)
        .await?;
    Ok(Json(InviteResponse {
        sent: req.emails.len(),
    }))
}

impl ApiRequest for InviteRequest {
    type Response = InviteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/shares/invite")?;
        Ok(client.post(full_url).json(&self))
    }
}
