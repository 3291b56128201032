//! Test doubles shared by the worker and orchestrator tests

use crate::record::RequestError;
use crate::traits::RequestClient;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) struct MockClient {
    target: String,
    delay: Option<Duration>,
    fail_every: Option<usize>,
    fail_at: Option<usize>,
    body_size: u64,
    counter: AtomicUsize,
}

impl MockClient {
    pub(crate) fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            delay: None,
            fail_every: None,
            fail_at: None,
            body_size: 256,
            counter: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail calls whose zero-based index is a positive multiple of `n`
    pub(crate) fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    /// Fail only the call with zero-based index `n`
    pub(crate) fn with_fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestClient for MockClient {
    fn target(&self) -> &str {
        &self.target
    }

    async fn execute(&self) -> Result<u64, RequestError> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(n) = self.fail_every {
            if count > 0 && count % n == 0 {
                return Err(RequestError::Response { status: 500 });
            }
        }

        if self.fail_at == Some(count) {
            return Err(RequestError::Connect("connection refused".into()));
        }

        Ok(self.body_size)
    }
}
