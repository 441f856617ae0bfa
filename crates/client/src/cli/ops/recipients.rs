use drop_client::api::{ApiError, RecipientsRequest};
use drop_client::listing::render_recipients;

#[derive(Debug, thiserror::Error)]
pub enum RecipientsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for RecipientsRequest {
    type Error = RecipientsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let recipients = ctx.client.recipients().await?;
        Ok(render_recipients(&recipients))
    }
}
