//! Worker statistics tracking

use std::time::Duration;

use tokio::time::Instant;

use crate::record::OutcomeRecord;

/// Per-worker counters
///
/// These count what a worker issued, not what the monitor accounted for:
/// records still in flight when the run stops are dropped.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Requests issued, including any whose record was dropped on stop
    pub issued: usize,

    /// Issued requests that failed
    pub failed: usize,

    /// Bytes received by successful requests
    pub received: u64,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Count one issued request
    pub fn record(&mut self, record: &OutcomeRecord) {
        self.issued += 1;
        if record.is_error() {
            self.failed += 1;
        } else {
            self.received += record.content_size;
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.issued += other.issued;
        self.failed += other.failed;
        self.received += other.received;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ErrorKind;

    #[test]
    fn test_worker_stats_defaults() {
        let stats = WorkerStats::default();
        assert_eq!(stats.issued, 0);
        assert_eq!(stats.failed, 0);
        assert!(stats.started_at.is_none());
        assert!(stats.ended_at.is_none());
    }

    #[test]
    fn test_worker_stats_record() {
        let mut stats = WorkerStats::new();
        stats.record(&OutcomeRecord::success(Duration::from_millis(1), 300));
        stats.record(&OutcomeRecord::success(Duration::from_millis(1), 200));
        stats.record(&OutcomeRecord::failure(ErrorKind::Connect));
        stats.record(&OutcomeRecord::failure(ErrorKind::Length));

        assert_eq!(stats.issued, 4);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.received, 500);
    }

    #[test]
    fn test_worker_stats_merge() {
        let mut a = WorkerStats {
            issued: 10,
            failed: 1,
            received: 1000,
            ..Default::default()
        };
        let b = WorkerStats {
            issued: 5,
            failed: 2,
            received: 500,
            ..Default::default()
        };

        a.merge(&b);

        assert_eq!(a.issued, 15);
        assert_eq!(a.failed, 3);
        assert_eq!(a.received, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_stats_start_stop() {
        let mut stats = WorkerStats::new();
        assert!(stats.elapsed().is_none());

        stats.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        stats.stop();

        assert_eq!(stats.elapsed(), Some(Duration::from_millis(10)));
    }
}
