use std::convert::Infallible;

use drop_client::api::ListFilesRequest;
use drop_client::listing::{render_error, render_table};

#[async_trait::async_trait]
impl crate::cli::op::Op for ListFilesRequest {
    // listing failures render as an inline row, they never fail the command
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        match ctx.client.call(self.clone()).await {
            Ok(records) => Ok(render_table(&records)),
            Err(e) => {
                tracing::warn!("listing failed: {}", e);
                Ok(render_error(e))
            }
        }
    }
}
