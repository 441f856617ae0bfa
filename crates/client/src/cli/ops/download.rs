use std::path::PathBuf;

use clap::Args;

use common::listing::format_size;
use drop_client::transfer::TransferError;

#[derive(Args, Debug, Clone)]
pub struct Download {
    /// Server-side file id (the ID column of `drop ls`)
    pub id: String,

    /// Save under this name (default: the file's original name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to save into (default: config download_dir, then working directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Download {
    type Error = DownloadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let display_name = match &self.name {
            Some(name) => name.clone(),
            None => match ctx.client.find_record(&self.id).await {
                Ok(Some(record)) => record.original_name,
                Ok(None) => self.id.clone(),
                Err(e) => {
                    tracing::warn!("could not look up original name for {}: {}", self.id, e);
                    self.id.clone()
                }
            },
        };

        let saved = ctx
            .transfer_client(self.out.clone())
            .download_and_decrypt(&self.id, &display_name, None, &ctx.control())
            .await?;

        Ok(format!(
            "Saved {} ({})",
            saved.path.display(),
            format_size(saved.size as u64)
        ))
    }
}
