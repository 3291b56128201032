//! Run coordinator
//!
//! The Monitor is the single consumer of worker results. It:
//! - Waits on the arming barrier so timing starts only once every worker is ready
//! - Folds each [`OutcomeRecord`](crate::record::OutcomeRecord) into [`Statistics`](crate::stats::Statistics)
//! - Watches the quota, time limit, user interrupt and fail-fast conditions
//! - Latches the stop signal and hands the statistics off exactly once
//!
//! Statistics are owned by the monitor task for the whole run, so no lock
//! guards them.
//!
//! # Example
//!
//! ```ignore
//! use hitbench_core::monitor::{interrupt, MonitorBuilder};
//!
//! let (monitor, output) = MonitorBuilder::new()
//!     .config(config)
//!     .collector(collector_rx)
//!     .arming(arming)
//!     .stop_signal(stop.clone())
//!     .interrupt(interrupt::ctrl_c())
//!     .build()?;
//!
//! let cause = monitor.run().await;
//! let stats = output.await?;
//! ```

mod builder;
mod executor;
pub mod interrupt;

pub use builder::MonitorBuilder;
pub use executor::{Monitor, TerminationCause};
pub use interrupt::Interrupt;
