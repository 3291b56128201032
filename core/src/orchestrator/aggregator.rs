//! Summary of what the worker pool issued

use std::time::Duration;

use crate::worker::WorkerStats;

/// Totals across every worker of a run
///
/// `issued` can exceed the monitor's `total_requests` when the run stopped
/// on a time limit or interrupt while requests were in flight.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of workers that completed
    pub workers: usize,

    /// Requests issued by all workers
    pub issued: usize,

    /// Issued requests that failed
    pub failed: usize,

    /// Bytes received by successful issued requests
    pub received: u64,

    /// Longest worker lifetime
    pub longest_worker: Duration,
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> PoolStats {
    let mut total = WorkerStats::new();
    for worker in stats {
        total.merge(worker);
    }

    let longest_worker = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    PoolStats {
        workers: stats.len(),
        issued: total.issued,
        failed: total.failed,
        received: total.received,
        longest_worker,
    }
}
