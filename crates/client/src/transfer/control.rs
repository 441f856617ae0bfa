use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::TransferError;

/// Cancellation and deadline for one transfer
///
/// The deadline covers the whole operation, network stage and decryption
/// alike. Cloning shares the cancellation token, so a clone handed to another
/// task can abort the transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferControl {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl TransferControl {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            cancel: CancellationToken::new(),
            timeout,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Start the clock for one operation
    pub(crate) fn arm(&self) -> Armed<'_> {
        Armed {
            cancel: &self.cancel,
            deadline: self.timeout.map(|t| (Instant::now() + t, t)),
        }
    }
}

pub(crate) struct Armed<'a> {
    cancel: &'a CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl Armed<'_> {
    /// Fail fast if the transfer was cancelled or ran out of time
    pub fn check(&self) -> Result<(), TransferError> {
        if self.cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        match self.deadline {
            Some((at, timeout)) if Instant::now() >= at => Err(TransferError::TimedOut(timeout)),
            _ => Ok(()),
        }
    }

    /// Drive `fut` unless cancellation or the deadline wins first
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, TransferError> {
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(TransferError::Cancelled),
                out = fut => Ok(out),
            }
        };

        match self.deadline {
            Some((at, timeout)) => tokio::time::timeout_at(at, guarded)
                .await
                .map_err(|_| TransferError::TimedOut(timeout))?,
            None => guarded.await,
        }
    }
}
