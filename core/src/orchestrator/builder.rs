//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::channel::ChannelConfig;
use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::monitor::Interrupt;
use crate::progress::{ConsoleReporter, ProgressReporter};
use crate::traits::RequestClient;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .config(RunConfig::new(1000, 10))
///     .client(client)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: RunConfig,
    client: Option<Arc<dyn RequestClient>>,
    channel_config: ChannelConfig,
    interrupt: Option<Interrupt>,
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            client: None,
            channel_config: ChannelConfig::default(),
            interrupt: None,
            reporter: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the request client shared by every worker
    pub fn client(mut self, client: Arc<dyn RequestClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
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

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not set or configuration validation
    /// fails.
    pub fn build(self) -> BenchResult<Orchestrator> {
        let client = self
            .client
            .ok_or_else(|| BenchError::missing_config("client"))?;

        self.config.validate()?;

        Ok(Orchestrator {
            config: self.config,
            client,
            channel_config: self.channel_config,
            interrupt: self.interrupt,
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(ConsoleReporter::new())),
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
