//! Builder pattern for Worker construction

use crate::error::{BenchError, BenchResult};
use crate::record::OutcomeRecord;
use crate::traits::RequestClient;

use super::executor::Worker;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .client(client)
///     .collector(tx)
///     .request_counter(counter, 100)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    client: Option<Arc<dyn RequestClient>>,
    collector: Option<mpsc::Sender<OutcomeRecord>>,
    request_counter: Option<Arc<AtomicUsize>>,
    total_requests: Option<usize>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            client: None,
            collector: None,
            request_counter: None,
            total_requests: None,
        }
    }

    /// Set the request client
    pub fn client(mut self, client: Arc<dyn RequestClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the collector channel sender
    pub fn collector(mut self, tx: mpsc::Sender<OutcomeRecord>) -> Self {
        self.collector = Some(tx);
        self
    }

    /// Share a request budget of `total` slots between workers
    pub fn request_counter(mut self, counter: Arc<AtomicUsize>, total: usize) -> Self {
        self.request_counter = Some(counter);
        self.total_requests = Some(total);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> BenchResult<Worker> {
        let client = self.client.ok_or(BenchError::missing_config("client"))?;
        let collector = self
            .collector
            .ok_or(BenchError::missing_config("collector"))?;

        let mut worker = Worker::new(self.id, client, collector);

        if let (Some(counter), Some(total)) = (self.request_counter, self.total_requests) {
            worker = worker.with_request_counter(counter, total);
        }

        Ok(worker)
    }
}
