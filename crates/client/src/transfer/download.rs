use std::fmt;
use std::path::PathBuf;

use common::wire::ServerMessage;
use tokio::sync::mpsc;

use super::control::{Armed, TransferControl};
use super::error::TransferError;
use super::sink::sanitize_file_name;
use super::TransferClient;

/// Where a single download is in its lifecycle
///
/// `Idle -> Fetching -> Decrypting -> Saved`, with `Failed` reachable from
/// any non-terminal stage. `Saved` and `Failed` are terminal; a new download
/// starts a new machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStage {
    Idle,
    Fetching,
    Decrypting,
    Saved,
    Failed,
}

impl DownloadStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, DownloadStage::Saved | DownloadStage::Failed)
    }

    pub fn can_advance_to(self, next: DownloadStage) -> bool {
        use DownloadStage::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Fetching, Decrypting)
                | (Decrypting, Saved)
                | (Idle, Failed)
                | (Fetching, Failed)
                | (Decrypting, Failed)
        )
    }
}

impl fmt::Display for DownloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadStage::Idle => "idle",
            DownloadStage::Fetching => "fetching",
            DownloadStage::Decrypting => "decrypting",
            DownloadStage::Saved => "saved",
            DownloadStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

struct StageMachine {
    stage: DownloadStage,
    events: Option<mpsc::UnboundedSender<DownloadStage>>,
}

impl StageMachine {
    fn new(events: Option<mpsc::UnboundedSender<DownloadStage>>) -> Self {
        Self {
            stage: DownloadStage::Idle,
            events,
        }
    }

    fn advance(&mut self, next: DownloadStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal download transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, to = %next, "download stage");
        self.stage = next;
        if let Some(tx) = &self.events {
            let _ = tx.send(next);
        }
    }
}

/// A decrypted file written to local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub size: usize,
}

impl TransferClient {
    /// Fetch `server_file_id`, decrypt it and save the plaintext as
    /// `display_name`
    ///
    /// Decryption is only attempted on a successful response, and the sink
    /// only ever sees fully decrypted bytes. Nothing is retried.
    pub async fn download_and_decrypt(
        &self,
        server_file_id: &str,
        display_name: &str,
        events: Option<mpsc::UnboundedSender<DownloadStage>>,
        control: &TransferControl,
    ) -> Result<SavedFile, TransferError> {
        let mut machine = StageMachine::new(events);
        let armed = control.arm();

        let result = self
            .run_download(&mut machine, &armed, server_file_id, display_name)
            .await;
        match &result {
            Ok(saved) => {
                machine.advance(DownloadStage::Saved);
                tracing::info!(
                    id = server_file_id,
                    path = %saved.path.display(),
                    "decrypted and saved"
                );
            }
            Err(e) => {
                machine.advance(DownloadStage::Failed);
                tracing::warn!(id = server_file_id, "download failed: {}", e);
            }
        }
        result
    }

    async fn run_download(
        &self,
        machine: &mut StageMachine,
        armed: &Armed<'_>,
        server_file_id: &str,
        display_name: &str,
    ) -> Result<SavedFile, TransferError> {
        let display_name = sanitize_file_name(display_name)?;
        armed.check()?;

        machine.advance(DownloadStage::Fetching);
        let response = armed
            .run(self.transport.download(server_file_id))
            .await?
            .map_err(|e| TransferError::FetchFailed {
                status: None,
                message: e.to_string(),
            })?;

        if !response.status.is_success() {
            return Err(TransferError::FetchFailed {
                status: Some(response.status.as_u16()),
                message: ServerMessage::describe(&response.body),
            });
        }
        tracing::debug!(
            id = server_file_id,
            bytes = response.body.len(),
            "fetched encrypted blob"
        );

        machine.advance(DownloadStage::Decrypting);
        armed.check()?;
        let plaintext = self.decryptor.decrypt(&response.body)?;
        drop(response);

        armed.check()?;
        let size = plaintext.len();
        let path = self.sink.save(display_name, plaintext).await?;
        Ok(SavedFile { path, size })
    }
}
