//! hitbench-core: run coordination for an HTTP load generator
//!
//! This crate holds everything between "a request finished" and "here are
//! the final numbers":
//!
//! - Outcome records and their failure classification
//! - The run-wide statistics accumulator
//! - The monitor that arms, drives and terminates a run
//! - The worker loop and the orchestrator that spawns the pool
//! - Configuration and error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod progress;
pub mod record;
pub mod stats;
pub mod sync;
pub mod timer;
pub mod traits;
pub mod worker;

#[cfg(test)]
mod testing;

pub use channel::ChannelConfig;
pub use config::{ConfigError, RunConfig};
pub use error::{BenchError, BenchResult};
pub use monitor::{Monitor, MonitorBuilder, TerminationCause};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, PoolStats, RunOutcome};
pub use progress::{ConsoleReporter, ProgressEvent, ProgressReporter, SilentReporter};
pub use record::{ErrorKind, OutcomeRecord, RequestError};
pub use stats::{ResponseTimeSamples, Statistics};
pub use sync::{ArmingBarrier, StopSignal};
pub use timer::ElapsedTimer;
pub use traits::RequestClient;
pub use worker::{Worker, WorkerBuilder, WorkerStats};
