use sharegate_daemon::http_server::api::client::ApiError;
use sharegate_daemon::http_server::api::v0::shares::info::InfoRequest;

#[derive(Debug, thiserror::Error)]
pub enum ShareInfoError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for InfoRequest {
    type Error = ShareInfoError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let info = ctx.client.call(self.clone()).await?;

        let uses = match info.max_uses {
            Some(max) => format!("{}/{}", info.times_used, max),
            None => format!("{}/unlimited", info.times_used),
        };
        let mut lines = vec![
            format!("id:         {}", info.id),
            format!("name:       {}", info.name.as_deref().unwrap_or("-")),
            format!("item:       {}/{}", info.collection, info.item),
            format!("uses:       {}", uses),
            format!("password:   {}", if info.password_protected { "yes" } else { "no" }),
        ];
        if let Some(start) = info.date_start {
            lines.push(format!("valid from: {}", start));
        }
        if let Some(end) = info.date_end {
            lines.push(format!("valid to:   {}", end));
        }
        Ok(lines.join("\n"))
    }
}
