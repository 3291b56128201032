//! Monitor event loop

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::config::RunConfig;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::record::OutcomeRecord;
use crate::stats::Statistics;
use crate::sync::{ArmingBarrier, StopSignal};
use crate::timer::ElapsedTimer;

use super::interrupt::Interrupt;

/// Why a run terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// The request quota was reached
    QuotaReached,
    /// The configured time limit expired
    TimeLimit,
    /// The user interrupted the run
    Interrupted,
    /// A request failed and the run aborts on the first error
    FailFast,
    /// Every worker hung up before any other condition fired
    ProducersClosed,
}

impl std::fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TerminationCause::QuotaReached => "request quota reached",
            TerminationCause::TimeLimit => "time limit expired",
            TerminationCause::Interrupted => "interrupted",
            TerminationCause::FailFast => "aborted on first error",
            TerminationCause::ProducersClosed => "all workers exited",
        };
        f.write_str(text)
    }
}

/// Run coordinator
///
/// Consumes itself when run: the statistics are handed off once and the
/// stop signal is latched once.
pub struct Monitor {
    pub(crate) config: RunConfig,
    pub(crate) collector: mpsc::Receiver<OutcomeRecord>,
    pub(crate) arming: Arc<ArmingBarrier>,
    pub(crate) stop: StopSignal,
    pub(crate) output: oneshot::Sender<Statistics>,
    pub(crate) interrupt: Interrupt,
    pub(crate) reporter: Arc<dyn ProgressReporter>,
}

impl Monitor {
    /// Drive the run to termination
    ///
    /// Waits for the arming barrier, processes records until a termination
    /// condition fires, then stops the timer, records the execution time,
    /// latches the stop signal and sends the statistics to the output
    /// channel, in that order.
    pub async fn run(self) -> TerminationCause {
        let Monitor {
            config,
            mut collector,
            arming,
            stop,
            output,
            mut interrupt,
            reporter,
        } = self;

        let mut stats = Statistics::new(config.requests);

        arming.wait().await;

        let mut timer = ElapsedTimer::new();
        timer.start();

        let time_limit = config.time_limit();
        let deadline = async move {
            match time_limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        tracing::info!(
            requests = config.requests,
            time_limit = ?time_limit,
            abort_on_error = config.abort_on_error,
            "Run armed"
        );
        reporter.report(ProgressEvent::Benchmarking {
            target: config.target.clone(),
        });

        let cause = loop {
            tokio::select! {
                received = collector.recv() => {
                    let Some(record) = received else {
                        break TerminationCause::ProducersClosed;
                    };
                    if let Some(cause) = on_record(&mut stats, &record, &config, reporter.as_ref()) {
                        break cause;
                    }
                }
                () = &mut deadline => break TerminationCause::TimeLimit,
                () = &mut interrupt => break TerminationCause::Interrupted,
            }
        };

        timer.stop();
        stats.set_execution_time(timer.elapsed().unwrap_or_default());

        stop.cancel();

        tracing::info!(
            cause = %cause,
            total_requests = stats.total_requests(),
            failed_requests = stats.total_failed_requests(),
            elapsed_secs = stats.total_execution_time().as_secs_f64(),
            "Run terminated"
        );

        if output.send(stats).is_err() {
            tracing::warn!("Statistics receiver dropped before handoff");
        }

        cause
    }
}

/// Apply one record and evaluate the record-driven termination conditions
fn on_record(
    stats: &mut Statistics,
    record: &OutcomeRecord,
    config: &RunConfig,
    reporter: &dyn ProgressReporter,
) -> Option<TerminationCause> {
    stats.apply(record);

    if record.is_error() && config.abort_on_error {
        tracing::debug!(error = ?record.error, "Request failed, aborting run");
        return Some(TerminationCause::FailFast);
    }

    let total = stats.total_requests();
    if is_progress_checkpoint(total, config.requests) {
        reporter.report(ProgressEvent::Completed(total));
    }

    if total == config.requests {
        reporter.report(ProgressEvent::Finished(total));
        return Some(TerminationCause::QuotaReached);
    }

    None
}

/// Progress is reported every tenth of the quota, starting at 10 requests
pub(crate) fn is_progress_checkpoint(total: usize, quota: usize) -> bool {
    let step = quota / 10;
    step > 0 && total >= 10 && total % step == 0
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("config", &self.config)
            .field("arming_pending", &self.arming.pending())
            .field("stopped", &self.stop.is_cancelled())
            .finish()
    }
}
