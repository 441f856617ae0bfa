//! Upload and download orchestration
//!
//! [`TransferClient`] drives both directions over a [`Transport`]:
//!
//! - uploads stream the file as a multipart form, reporting progress, and
//!   decode the server's reply at the boundary into an [`UploadReply`];
//! - downloads fetch the `iv || ciphertext` blob, hand it to a
//!   [`BlobDecryptor`] and only then pass plaintext to a [`SaveSink`].
//!
//! Every transfer is independent. The only thing concurrent transfers share
//! is the read-only key behind the decryptor.
//!
//! [`UploadReply`]: common::wire::UploadReply
//! [`BlobDecryptor`]: common::crypto::BlobDecryptor

mod control;
mod download;
mod error;
mod progress;
mod sink;
mod transport;
mod upload;

pub use control::TransferControl;
pub use download::{DownloadStage, SavedFile};
pub use error::TransferError;
pub use progress::{ProgressReporter, UploadEvent};
pub use sink::{sanitize_file_name, DirectorySink, SaveError, SaveSink};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError, UploadForm};
pub use upload::{normalize_recipient, UploadRequest, UploadResult};

use std::sync::Arc;
use std::time::Duration;

use common::crypto::BlobDecryptor;

/// How long the "complete" indication stays up before an upload goes idle
pub const DEFAULT_IDLE_GRACE: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct TransferClient {
    transport: Arc<dyn Transport>,
    decryptor: Arc<dyn BlobDecryptor>,
    sink: Arc<dyn SaveSink>,
    idle_grace: Duration,
}

impl TransferClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        decryptor: Arc<dyn BlobDecryptor>,
        sink: Arc<dyn SaveSink>,
    ) -> Self {
        Self {
            transport,
            decryptor,
            sink,
            idle_grace: DEFAULT_IDLE_GRACE,
        }
    }

    pub fn with_idle_grace(mut self, idle_grace: Duration) -> Self {
        self.idle_grace = idle_grace;
        self
    }
}
