use common::crypto::CryptoError;

use super::sink::SaveError;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),
    #[error("upload failed{}: {message}", status_suffix(.status))]
    UploadFailed { status: Option<u16>, message: String },
    /// The server accepted the request but reported a logical error
    #[error("server rejected upload: {0}")]
    ServerRejected(String),
    #[error("failed to fetch encrypted file{}: {message}", status_suffix(.status))]
    FetchFailed { status: Option<u16>, message: String },
    #[error("failed to decrypt file: {0}")]
    DecryptionFailed(#[from] CryptoError),
    #[error("failed to save file: {0}")]
    SaveFailed(#[from] SaveError),
    #[error("transfer cancelled")]
    Cancelled,
    #[error("transfer timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}
