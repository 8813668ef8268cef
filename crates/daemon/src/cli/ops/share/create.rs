use sharegate_daemon::http_server::api::client::ApiError;
use sharegate_daemon::http_server::api::v0::shares::create::CreateRequest;

#[derive(Debug, thiserror::Error)]
pub enum ShareCreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for CreateRequest {
    type Error = ShareCreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let info = ctx.client.call(self.clone()).await?;

        Ok(format!(
            "Created share {} for {}/{}{}",
            info.id,
            info.collection,
            info.item,
            if info.password_protected {
                " (password protected)"
            } else {
                ""
            }
        ))
    }
}
