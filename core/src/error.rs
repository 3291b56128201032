//! Error types for hitbench-core
//!
//! Request-level failures are not errors here: they travel as data on
//! [`OutcomeRecord`](crate::record::OutcomeRecord). These types cover
//! construction and orchestration problems only.

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
#[derive(Error, Debug)]
pub enum BenchError {
    /// A builder was finalized without a required field
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool or monitor could not complete the run
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

impl BenchError {
    /// Shorthand for [`BenchError::MissingConfig`]
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Shorthand for [`BenchError::Orchestration`]
    pub fn orchestration(message: impl Into<String>) -> Self {
        Self::Orchestration(message.into())
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
