use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::Caller;
use crate::shares::{NewShare, ShareError, ShareInfo};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Collection the shared item lives in
    #[arg(long)]
    pub collection: String,
    /// Id of the shared item
    #[arg(long)]
    pub item: String,
    /// Display name
    #[arg(long)]
    #[serde(default)]
    pub name: Option<String>,
    /// Role granted to share holders
    #[arg(long)]
    #[serde(default)]
    pub role: Option<Uuid>,
    /// Require this password to log in
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Valid from (RFC 3339)
    #[arg(long, value_parser = parse_rfc3339)]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_start: Option<OffsetDateTime>,
    /// Valid until (RFC 3339)
    #[arg(long, value_parser = parse_rfc3339)]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_end: Option<OffsetDateTime>,
    /// Maximum number of logins
    #[arg(long)]
    #[serde(default)]
    pub max_uses: Option<i64>,
}

fn parse_rfc3339(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339)
}

impl From<CreateRequest> for NewShare {
    fn from(req: CreateRequest) -> Self {
        NewShare {
            name: req.name,
            role: req.role,
            collection: req.collection,
            item: req.item,
            password: req.password,
            date_start: req.date_start,
            date_end: req.date_end,
            max_uses: req.max_uses,
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(accountability): Caller,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Response, ShareError> {
    let Json(req) = payload?;
    let info = state
        .shares()
        .create_share(&accountability, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(info)).into_response())
}

impl ApiRequest for CreateRequest {
    type Response = ShareInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/shares")?;
        Ok(client.post(full_url).json(&self))
    }
}
