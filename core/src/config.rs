//! Run configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Run configuration
///
/// Defines how a benchmark run is driven: how many requests to issue, how
/// many workers issue them, and when to give up early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Request quota for the whole run
    pub requests: usize,

    /// Number of concurrent worker tasks
    pub concurrency: usize,

    /// Wall-clock limit in seconds, 0 disables it
    #[serde(default)]
    pub time_limit_secs: u64,

    /// Terminate on the first failed request
    #[serde(default = "default_abort_on_error")]
    pub abort_on_error: bool,

    /// Human-readable target, used in progress output
    #[serde(default)]
    pub target: String,
}

fn default_abort_on_error() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            requests: 1,
            concurrency: 1,
            time_limit_secs: 0,
            abort_on_error: default_abort_on_error(),
            target: String::new(),
        }
    }
}

impl RunConfig {
    /// Create a config for `requests` requests issued by `concurrency` workers
    pub fn new(requests: usize, concurrency: usize) -> Self {
        Self {
            requests,
            concurrency,
            ..Default::default()
        }
    }

    /// Set the time limit in seconds (0 disables it)
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Set fail-fast behaviour
    pub fn with_abort_on_error(mut self, abort: bool) -> Self {
        self.abort_on_error = abort;
        self
    }

    /// Set the target description
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Configured time limit, `None` when disabled
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_secs > 0).then(|| Duration::from_secs(self.time_limit_secs))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests == 0 {
            return Err(ConfigError::InvalidRequests(
                "request count must be at least 1".into(),
            ));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "concurrency must be at least 1".into(),
            ));
        }

        if self.concurrency > self.requests {
            return Err(ConfigError::InvalidConcurrency(format!(
                "concurrency ({}) cannot exceed the request count ({})",
                self.concurrency, self.requests
            )));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid request quota
    #[error("Invalid request count: {0}")]
    InvalidRequests(String),

    /// Invalid concurrency value
    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),
}
