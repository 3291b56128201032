//! Worker module for issuing benchmark requests
//!
//! A Worker runs the loop **claim -> execute -> post -> repeat**:
//!
//! 1. Signals readiness on the arming barrier and waits for the run to arm
//! 2. Claims a slot from the shared request budget
//! 3. Executes the request through a [`RequestClient`](crate::traits::RequestClient)
//!    and times it
//! 4. Posts the resulting [`OutcomeRecord`](crate::record::OutcomeRecord) to the monitor
//! 5. Repeats until the stop signal is latched or the budget is exhausted
//!
//! Workers never touch the run statistics; the monitor owns them.
//!
//! # Example
//!
//! ```ignore
//! use hitbench_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .client(client)
//!     .collector(tx)
//!     .request_counter(counter, 1000)
//!     .build()?;
//!
//! let stats = worker.run(arming, stop).await;
//! println!("Issued: {}", stats.issued);
//! ```

mod builder;
mod executor;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use stats::WorkerStats;
