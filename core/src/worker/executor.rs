//! Worker execution loop

use crate::record::OutcomeRecord;
use crate::sync::{ArmingBarrier, StopSignal};
use crate::traits::RequestClient;

use super::stats::WorkerStats;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Worker issues requests in a loop: claim -> execute -> post -> repeat
///
/// Workers are tokio tasks managed by the Orchestrator. They share a
/// RequestClient via Arc and post one record per attempt through an mpsc
/// channel.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Request client (shared across workers via Arc)
    client: Arc<dyn RequestClient>,

    /// Channel sender for outcome records
    collector: mpsc::Sender<OutcomeRecord>,

    /// Shared request counter for fair distribution
    request_counter: Option<Arc<AtomicUsize>>,

    /// Total requests (when using counter-based distribution)
    total_requests: Option<usize>,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        client: Arc<dyn RequestClient>,
        collector: mpsc::Sender<OutcomeRecord>,
    ) -> Self {
        Self {
            id,
            client,
            collector,
            request_counter: None,
            total_requests: None,
        }
    }

    /// Set a shared request counter for fair work distribution
    ///
    /// When set, workers atomically claim request slots so the pool never
    /// issues more than `total_requests`.
    pub fn with_request_counter(
        mut self,
        counter: Arc<AtomicUsize>,
        total_requests: usize,
    ) -> Self {
        self.request_counter = Some(counter);
        self.total_requests = Some(total_requests);
        self
    }

    /// Run the worker loop
    ///
    /// Arrives at `arming`, waits for every other participant, then issues
    /// requests until `stop` is latched, the budget runs out or the collector
    /// hangs up.
    pub async fn run(self, arming: Arc<ArmingBarrier>, stop: StopSignal) -> WorkerStats {
        let mut stats = WorkerStats::new();

        arming.arrive();
        tokio::select! {
            biased;

            _ = stop.cancelled() => {
                tracing::debug!(worker_id = self.id, "Stopped before the run was armed");
                return stats;
            }
            _ = arming.wait() => {}
        }

        stats.start();
        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            if stop.is_cancelled() {
                break;
            }

            if !self.try_claim_request() {
                tracing::debug!(worker_id = self.id, "Request budget exhausted, worker stopping");
                break;
            }

            let record = tokio::select! {
                biased;

                _ = stop.cancelled() => {
                    tracing::debug!(worker_id = self.id, "Worker received stop signal");
                    break;
                }
                record = self.execute_one() => record,
            };

            stats.record(&record);

            tokio::select! {
                biased;

                _ = stop.cancelled() => break,
                sent = self.collector.send(record) => {
                    if sent.is_err() {
                        tracing::debug!(worker_id = self.id, "Collector closed, worker stopping");
                        break;
                    }
                }
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            issued = stats.issued,
            failed = stats.failed,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Execute and time a single request
    async fn execute_one(&self) -> OutcomeRecord {
        let start = Instant::now();
        let result = self.client.execute().await;
        let elapsed = start.elapsed();

        if let Err(e) = &result {
            tracing::debug!(worker_id = self.id, error = %e, "Request failed");
        }

        OutcomeRecord::from_result(result, elapsed)
    }

    /// Try to claim a request slot from the shared counter
    ///
    /// Always returns `true` if not using counter-based distribution.
    fn try_claim_request(&self) -> bool {
        if let (Some(counter), Some(total)) = (&self.request_counter, self.total_requests) {
            let claimed = counter.fetch_add(1, Ordering::SeqCst);
            if claimed >= total {
                // Over-claimed near the limit; keep the counter accurate for the others.
                counter.fetch_sub(1, Ordering::SeqCst);
                return false;
            }
            true
        } else {
            true
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("target", &self.client.target())
            .field("total_requests", &self.total_requests)
            .finish()
    }
}
