//! HTTP transport for hitbench
//!
//! Provides [`HttpClient`], the reqwest-backed implementation of
//! [`RequestClient`](hitbench_core::RequestClient), and the [`HttpTarget`]
//! description it is built from.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod target;

pub use client::HttpClient;
pub use target::{parse_header, HttpConfigError, HttpTarget};
