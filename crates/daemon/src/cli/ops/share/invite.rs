use sharegate_daemon::http_server::api::client::ApiError;
use sharegate_daemon::http_server::api::v0::shares::invite::InviteRequest;

#[derive(Debug, thiserror::Error)]
pub enum ShareInviteError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for InviteRequest {
    type Error = ShareInviteError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.clone()).await?;
        Ok(format!(
            "Sent {} invitation(s) for share {}",
            response.sent, self.share
        ))
    }
}
