//! Orchestrator execution logic

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channel::ChannelConfig;
use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::monitor::{interrupt, Interrupt, MonitorBuilder, TerminationCause};
use crate::progress::ProgressReporter;
use crate::stats::Statistics;
use crate::sync::{ArmingBarrier, StopSignal};
use crate::traits::RequestClient;
use crate::worker::WorkerBuilder;

use super::aggregator::{aggregate_worker_stats, PoolStats};

/// Result of a completed run
#[derive(Debug)]
pub struct RunOutcome {
    /// Statistics handed off by the monitor
    pub statistics: Statistics,

    /// Why the run stopped
    pub cause: TerminationCause,

    /// What the worker pool issued
    pub pool: PoolStats,
}

/// Orchestrator manages the run lifecycle
///
/// Responsible for spawning the monitor and the workers, and collecting the
/// final statistics.
pub struct Orchestrator {
    pub(crate) config: RunConfig,
    pub(crate) client: Arc<dyn RequestClient>,
    pub(crate) channel_config: ChannelConfig,
    pub(crate) interrupt: Option<Interrupt>,
    pub(crate) reporter: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the benchmark
    ///
    /// Spawns the monitor and one task per unit of concurrency, waits for the
    /// statistics handoff, then joins the workers.
    pub async fn run(self) -> BenchResult<RunOutcome> {
        let Orchestrator {
            config,
            client,
            channel_config,
            interrupt,
            reporter,
        } = self;

        let (collector_tx, collector_rx) = mpsc::channel(channel_config.collector_buffer);
        let arming = Arc::new(ArmingBarrier::new(config.concurrency));
        let stop = StopSignal::new();
        let request_counter = Arc::new(AtomicUsize::new(0));

        tracing::info!(
            target_url = %config.target,
            requests = config.requests,
            concurrency = config.concurrency,
            time_limit = ?config.time_limit(),
            "Starting run"
        );

        let mut monitor = MonitorBuilder::new()
            .config(config.clone())
            .collector(collector_rx)
            .arming(Arc::clone(&arming))
            .stop_signal(stop.clone())
            .reporter(reporter);
        if let Some(interrupt) = interrupt {
            monitor = monitor.interrupt(interrupt);
        }
        let (monitor, output) = monitor.build()?;

        let workers = (0..config.concurrency)
            .map(|worker_id| {
                WorkerBuilder::new(worker_id)
                    .client(Arc::clone(&client))
                    .collector(collector_tx.clone())
                    .request_counter(Arc::clone(&request_counter), config.requests)
                    .build()
            })
            .collect::<BenchResult<Vec<_>>>()?;
        drop(collector_tx);

        let monitor_handle = tokio::spawn(monitor.run());
        let handles: Vec<_> = workers
            .into_iter()
            .map(|worker| tokio::spawn(worker.run(Arc::clone(&arming), stop.clone())))
            .collect();

        let cause = match monitor_handle.await {
            Ok(cause) => cause,
            Err(e) => {
                // The monitor never latched the signal; release the workers.
                stop.cancel();
                return Err(BenchError::orchestration(format!(
                    "monitor task failed: {}",
                    e
                )));
            }
        };

        let statistics = output.await.map_err(|_| {
            BenchError::orchestration("monitor exited without handing off statistics")
        })?;

        let mut results = Vec::with_capacity(handles.len());
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => {
                    tracing::debug!(
                        worker_id = idx,
                        issued = stats.issued,
                        failed = stats.failed,
                        "Worker completed"
                    );
                    results.push(stats);
                }
                Err(e) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        let pool = aggregate_worker_stats(&results);
        tracing::info!(
            cause = %cause,
            issued = pool.issued,
            accounted = statistics.total_requests(),
            elapsed_secs = statistics.total_execution_time().as_secs_f64(),
            "Run completed"
        );

        Ok(RunOutcome {
            statistics,
            cause,
            pool,
        })
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C becomes the user interrupt source, replacing any interrupt set
    /// on the builder.
    pub async fn run_with_signal_handling(mut self) -> BenchResult<RunOutcome> {
        self.interrupt = Some(interrupt::ctrl_c());
        self.run().await
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("target", &self.client.target())
            .field("channel_config", &self.channel_config)
            .finish()
    }
}
