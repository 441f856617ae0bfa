/// Upload progress as a whole percentage
///
/// Tracks bytes handed to the transport and reports
/// `round(sent / total * 100)`, clamped to `[0, 100]`. Reported values never
/// go backwards: a late or repeated update that would lower the percentage
/// is swallowed.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    sent: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            sent: 0,
            last: None,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Record `bytes` more sent. Returns the new percentage if it moved.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes).min(self.total);
        self.report(percent(self.sent, self.total))
    }

    /// Force the first report (0%) before any bytes have moved
    pub fn start(&mut self) -> Option<u8> {
        self.report(percent(self.sent, self.total))
    }

    /// Mark the transfer as fully sent
    pub fn finish(&mut self) -> Option<u8> {
        self.sent = self.total;
        self.report(100)
    }

    fn report(&mut self, pct: u8) -> Option<u8> {
        match self.last {
            Some(last) if pct <= last => None,
            _ => {
                self.last = Some(pct);
                Some(pct)
            }
        }
    }
}

/// `round(sent / total * 100)`; an empty total counts as done
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent.min(total) as f64 / total as f64 * 100.0).round();
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1); // 0.5 rounds away from zero
        assert_eq!(percent(199, 200), 100);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(500, 100), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_tracker_reports_only_increases() {
        let mut tracker = ProgressTracker::new(1000);
        assert_eq!(tracker.start(), Some(0));
        assert_eq!(tracker.start(), None);
        assert_eq!(tracker.advance(1), None);
        assert_eq!(tracker.advance(249), Some(25));
        assert_eq!(tracker.advance(0), None);
        assert_eq!(tracker.advance(750), Some(100));
        assert_eq!(tracker.finish(), None);
        assert_eq!(tracker.sent(), 1000);
    }

    #[test]
    fn test_tracker_sequence_is_monotonic() {
        let mut tracker = ProgressTracker::new(4099);
        let mut seen = vec![];
        seen.extend(tracker.start());
        for chunk in [17u64, 1000, 3, 900, 2000, 5000] {
            seen.extend(tracker.advance(chunk));
        }
        seen.extend(tracker.finish());

        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
