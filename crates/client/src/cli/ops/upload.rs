use std::path::PathBuf;

use clap::Args;
use tokio::sync::mpsc;

use common::listing::{format_size, SortSpec};
use drop_client::listing::{render_error, render_table};
use drop_client::transfer::{TransferError, UploadEvent, UploadRequest};

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// File to upload
    pub path: PathBuf,

    /// Recipient address from `drop recipients` (default: Everyone)
    #[arg(long, short)]
    pub recipient: Option<String>,

    /// Don't print the refreshed listing afterwards
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = UploadRequest::from_path(&self.path).await?;
        if let Some(recipient) = &self.recipient {
            request = request.to(recipient.clone());
        }

        let label = format!(
            "{} ({})",
            request.file_name,
            format_size(request.data.len() as u64)
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            let mut line_open = false;
            while let Some(event) = rx.recv().await {
                match event {
                    UploadEvent::Progress(pct) => {
                        eprint!("\rUploading {}: {:>3}%", label, pct);
                        line_open = true;
                    }
                    UploadEvent::Complete => {
                        eprintln!("\rUploading {}: complete", label);
                        line_open = false;
                    }
                    UploadEvent::Idle => break,
                }
            }
            if line_open {
                eprintln!();
            }
        });

        let result = ctx
            .transfer_client(None)
            .upload(request, Some(tx), &ctx.control())
            .await;
        // Idle is always the last event, so this returns promptly
        let _ = printer.await;
        let result = result?;

        let mut output = result
            .message
            .unwrap_or_else(|| "File uploaded successfully!".to_string());

        if !self.no_refresh {
            let listing = match ctx.client.list_files(SortSpec::default()).await {
                Ok(records) => render_table(&records),
                Err(e) => render_error(e),
            };
            output.push_str("\n\n");
            output.push_str(&listing);
        }

        Ok(output)
    }
}
