//! Builder pattern for Monitor construction

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::progress::{ConsoleReporter, ProgressReporter};
use crate::record::OutcomeRecord;
use crate::stats::Statistics;
use crate::sync::{ArmingBarrier, StopSignal};

use super::executor::Monitor;
use super::interrupt::{self, Interrupt};

/// Builder for creating a [`Monitor`]
///
/// The collector receiver, arming barrier and stop signal are shared with the
/// worker pool and must be supplied. The interrupt defaults to one that never
/// fires; progress goes to stderr unless another reporter is set.
pub struct MonitorBuilder {
    config: RunConfig,
    collector: Option<mpsc::Receiver<OutcomeRecord>>,
    arming: Option<Arc<ArmingBarrier>>,
    stop: Option<StopSignal>,
    interrupt: Option<Interrupt>,
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl MonitorBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            collector: None,
            arming: None,
            stop: None,
            interrupt: None,
            reporter: None,
        }
    }

    /// Set the run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the receiving end of the collector channel
    pub fn collector(mut self, rx: mpsc::Receiver<OutcomeRecord>) -> Self {
        self.collector = Some(rx);
        self
    }

    /// Set the arming barrier shared with the workers
    pub fn arming(mut self, barrier: Arc<ArmingBarrier>) -> Self {
        self.arming = Some(barrier);
        self
    }

    /// Set the stop signal observed by the workers
    pub fn stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Set the user interrupt source
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Set the progress reporter
    pub fn reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the monitor and return it with the statistics receiver
    ///
    /// # Errors
    ///
    /// Returns an error if a shared primitive is missing or the configuration
    /// is invalid.
    pub fn build(self) -> BenchResult<(Monitor, oneshot::Receiver<Statistics>)> {
        let collector = self
            .collector
            .ok_or_else(|| BenchError::missing_config("collector"))?;
        let arming = self
            .arming
            .ok_or_else(|| BenchError::missing_config("arming"))?;
        let stop = self
            .stop
            .ok_or_else(|| BenchError::missing_config("stop_signal"))?;

        self.config.validate()?;

        let (output_tx, output_rx) = oneshot::channel();

        let monitor = Monitor {
            config: self.config,
            collector,
            arming,
            stop,
            output: output_tx,
            interrupt: self.interrupt.unwrap_or_else(interrupt::never),
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(ConsoleReporter::new())),
        };

        Ok((monitor, output_rx))
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
