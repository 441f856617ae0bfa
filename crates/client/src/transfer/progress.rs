use std::sync::Arc;

use common::progress::ProgressTracker;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Observable upload lifecycle: percentages, then `Complete`, then `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEvent {
    Progress(u8),
    Complete,
    Idle,
}

/// Shared handle the transport uses to report bytes as they go out
///
/// Clones feed the same tracker, so progress stays monotonic however many
/// places report into it.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tracker: Arc<Mutex<ProgressTracker>>,
    events: Option<mpsc::UnboundedSender<UploadEvent>>,
}

impl ProgressReporter {
    pub fn new(total: u64, events: Option<mpsc::UnboundedSender<UploadEvent>>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(ProgressTracker::new(total))),
            events,
        }
    }

    pub fn start(&self) {
        let pct = self.tracker.lock().start();
        self.emit_progress(pct);
    }

    pub fn advance(&self, bytes: u64) {
        let pct = self.tracker.lock().advance(bytes);
        self.emit_progress(pct);
    }

    pub fn finish(&self) {
        let pct = self.tracker.lock().finish();
        self.emit_progress(pct);
    }

    pub(crate) fn emit(&self, event: UploadEvent) {
        if let Some(tx) = &self.events {
            // a dropped receiver just means nobody is watching anymore
            let _ = tx.send(event);
        }
    }

    fn emit_progress(&self, pct: Option<u8>) {
        if let Some(pct) = pct {
            self.emit(UploadEvent::Progress(pct));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_emits_deduplicated_progress() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reporter = ProgressReporter::new(100, Some(tx));
        let clone = reporter.clone();

        reporter.start();
        clone.advance(50);
        reporter.advance(0);
        clone.advance(50);
        reporter.finish();
        reporter.emit(UploadEvent::Complete);
        drop(reporter);
        drop(clone);

        let mut events = vec![];
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                UploadEvent::Progress(0),
                UploadEvent::Progress(50),
                UploadEvent::Progress(100),
                UploadEvent::Complete,
            ]
        );
    }
}
