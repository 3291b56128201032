//! Core traits implemented by transport crates
//!
//! Defined in core so the worker loop stays transport agnostic.
//! The HTTP implementation lives in `hitbench-http`.

use async_trait::async_trait;

use crate::record::RequestError;

/// Issues one request against the benchmark target
#[async_trait]
pub trait RequestClient: Send + Sync {
    /// Target description (usually the URL)
    fn target(&self) -> &str;

    /// Issue one request and return the number of body bytes received
    async fn execute(&self) -> Result<u64, RequestError>;
}
