//! Orchestrator for run lifecycle management
//!
//! The Orchestrator wires a complete run together:
//! - Creating the collector channel, arming barrier and stop signal
//! - Spawning the [`Monitor`](crate::monitor::Monitor) and the worker tasks
//! - Waiting for the statistics handoff
//! - Joining the workers once the stop signal is latched
//!
//! # Example
//!
//! ```ignore
//! use hitbench_core::{OrchestratorBuilder, RunConfig};
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .config(RunConfig::new(1000, 10).with_target(url))
//!     .client(client)
//!     .build()?;
//!
//! let outcome = orchestrator.run_with_signal_handling().await?;
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, PoolStats};
pub use builder::OrchestratorBuilder;
pub use executor::{Orchestrator, RunOutcome};

#[cfg(test)]
mod tests;
