use sharegate_daemon::http_server::api::client::ApiError;
use sharegate_daemon::http_server::api::v0::shares::auth::AuthRequest;

#[derive(Debug, thiserror::Error)]
pub enum ShareAuthError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for AuthRequest {
    type Error = ShareAuthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.clone()).await?;

        Ok(format!(
            "access_token:  {}\nrefresh_token: {}\nexpires_in:    {}s",
            response.access_token, response.refresh_token, response.expires_in
        ))
    }
}
