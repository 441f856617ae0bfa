use std::path::Path;

use bytes::Bytes;
use common::listing::{FileRecord, EVERYONE};
use common::wire::{ServerMessage, UploadReply};
use reqwest::StatusCode;
use tokio::sync::mpsc;

use super::control::TransferControl;
use super::error::TransferError;
use super::progress::{ProgressReporter, UploadEvent};
use super::transport::UploadForm;
use super::TransferClient;

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub data: Bytes,
    /// `None`, `""` and `"Everyone"` all mean everyone
    pub recipient: Option<String>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
            recipient: None,
        }
    }

    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Read a local file into a request named after its final path component
    pub async fn from_path(path: &Path) -> Result<Self, TransferError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TransferError::Validation("please select a file first".to_string()))?;
        let data = tokio::fs::read(path).await.map_err(|e| {
            TransferError::Validation(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(Self::new(file_name, data))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub message: Option<String>,
    pub file: Option<FileRecord>,
}

/// The `recipient` form value for a selection
///
/// Anything other than empty or the sentinel is sent verbatim; it is not
/// checked against the recipients the server advertised.
pub fn normalize_recipient(recipient: Option<&str>) -> String {
    match recipient {
        Some(r) if !r.is_empty() && r != EVERYONE => r.to_string(),
        _ => EVERYONE.to_string(),
    }
}

impl TransferClient {
    /// Upload one file
    ///
    /// Progress goes out on `events` as `Progress(0) .. Progress(100)`, then
    /// `Complete`, then `Idle` once the grace period has passed or the
    /// transfer is cancelled. A failed upload goes straight to `Idle`.
    pub async fn upload(
        &self,
        request: UploadRequest,
        events: Option<mpsc::UnboundedSender<UploadEvent>>,
        control: &TransferControl,
    ) -> Result<UploadResult, TransferError> {
        if request.file_name.trim().is_empty() || request.data.is_empty() {
            return Err(TransferError::Validation(
                "please select a file first".to_string(),
            ));
        }

        let recipient = normalize_recipient(request.recipient.as_deref());
        let reporter = ProgressReporter::new(request.data.len() as u64, events);
        tracing::info!(
            file = %request.file_name,
            bytes = request.data.len(),
            recipient = %recipient,
            "uploading"
        );

        let result = self.send_upload(request, recipient, &reporter, control).await;
        match &result {
            Ok(_) => {
                reporter.finish();
                reporter.emit(UploadEvent::Complete);
                // cancelling only cuts the grace short, the upload already landed
                let cancel = control.cancel_token();
                tokio::select! {
                    _ = tokio::time::sleep(self.idle_grace) => {}
                    _ = cancel.cancelled() => {}
                }
            }
            Err(e) => tracing::warn!("upload failed: {}", e),
        }
        reporter.emit(UploadEvent::Idle);
        result
    }

    async fn send_upload(
        &self,
        request: UploadRequest,
        recipient: String,
        reporter: &ProgressReporter,
        control: &TransferControl,
    ) -> Result<UploadResult, TransferError> {
        let armed = control.arm();
        armed.check()?;

        let form = UploadForm {
            file_name: request.file_name,
            data: request.data,
            recipient,
        };
        reporter.start();
        let response = armed
            .run(self.transport.upload(form, reporter.clone()))
            .await?
            .map_err(|e| TransferError::UploadFailed {
                status: None,
                message: e.to_string(),
            })?;

        if response.status != StatusCode::OK {
            return Err(TransferError::UploadFailed {
                status: Some(response.status.as_u16()),
                message: ServerMessage::describe(&response.body),
            });
        }

        match UploadReply::from_json(&response.body) {
            Ok(UploadReply::Accepted { message, file }) => {
                tracing::info!(reply = message.as_deref().unwrap_or(""), "upload accepted");
                Ok(UploadResult { message, file })
            }
            Ok(UploadReply::Rejected { reason }) => Err(TransferError::ServerRejected(reason)),
            Err(e) => Err(TransferError::UploadFailed {
                status: Some(response.status.as_u16()),
                message: format!("undecodable reply: {}", e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_recipient() {
        assert_eq!(normalize_recipient(None), EVERYONE);
        assert_eq!(normalize_recipient(Some("")), EVERYONE);
        assert_eq!(normalize_recipient(Some(EVERYONE)), EVERYONE);
        assert_eq!(normalize_recipient(Some("192.168.1.20")), "192.168.1.20");
    }

    #[tokio::test]
    async fn test_from_path_reads_file_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"remember the milk").unwrap();

        let request = UploadRequest::from_path(&path).await.unwrap();
        assert_eq!(request.file_name, "notes.txt");
        assert_eq!(&request.data[..], b"remember the milk");
        assert_eq!(request.recipient, None);
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadRequest::from_path(&dir.path().join("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Validation(_)));
    }
}
