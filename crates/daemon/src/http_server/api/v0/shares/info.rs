use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::shares::{ShareError, ShareInfo};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct InfoRequest {
    /// Id of the share to describe
    pub share_id: Uuid,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(share_id): Path<String>,
) -> Result<Json<ShareInfo>, ShareError> {
    let share_id = Uuid::parse_str(&share_id).map_err(|_| ShareError::NotFound)?;
    let info = state.shares().share_info(share_id).await?;
    Ok(Json(info))
}

impl ApiRequest for InfoRequest {
    type Response = ShareInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/shares/info/{}", self.share_id))?;
        Ok(client.get(full_url))
    }
}
