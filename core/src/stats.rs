//! Run-wide statistics accumulated by the monitor

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::record::{ErrorKind, OutcomeRecord};

/// Fixed-capacity, append-only response time buffer (nanoseconds)
///
/// Serializes as the written samples only. There is no way to build one
/// other than [`with_capacity`](Self::with_capacity), so the write index
/// never passes the capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTimeSamples {
    data: Vec<u64>,
    next: usize,
}

impl ResponseTimeSamples {
    /// Pre-size the buffer to `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            next: 0,
        }
    }

    /// Write `nanos` at the next index.
    ///
    /// Returns `false` and leaves the buffer untouched when it is full.
    fn push(&mut self, nanos: u64) -> bool {
        match self.data.get_mut(self.next) {
            Some(slot) => {
                *slot = nanos;
                self.next += 1;
                true
            }
            None => false,
        }
    }

    /// Samples written so far, in arrival order
    pub fn as_slice(&self) -> &[u64] {
        &self.data[..self.next]
    }

    /// Number of samples written
    pub fn len(&self) -> usize {
        self.next
    }

    /// Whether no sample has been written
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    /// Declared capacity
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl Serialize for ResponseTimeSamples {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

/// Aggregate statistics for one run
///
/// Only the [`Monitor`](crate::monitor::Monitor) mutates a `Statistics`
/// while a run is in progress; it is moved to the consumer afterwards.
/// Serialize-only: a deserialized value could break the sample index
/// invariant or carry an execution time the monitor never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    response_time_samples: ResponseTimeSamples,

    total_requests: usize,
    total_failed_requests: usize,

    err_connect: usize,
    err_receive: usize,
    err_length: usize,
    err_response: usize,
    err_exception: usize,

    total_response_time: Duration,
    total_received: u64,

    total_execution_time: Duration,
}

impl Statistics {
    /// Empty statistics with room for `quota` response time samples
    pub fn new(quota: usize) -> Self {
        Self {
            response_time_samples: ResponseTimeSamples::with_capacity(quota),
            total_requests: 0,
            total_failed_requests: 0,
            err_connect: 0,
            err_receive: 0,
            err_length: 0,
            err_response: 0,
            err_exception: 0,
            total_response_time: Duration::ZERO,
            total_received: 0,
            total_execution_time: Duration::ZERO,
        }
    }

    /// Fold one record into the aggregate
    pub fn apply(&mut self, record: &OutcomeRecord) {
        self.total_requests += 1;

        match record.error {
            Some(kind) => {
                self.total_failed_requests += 1;
                match kind {
                    ErrorKind::Connect => self.err_connect += 1,
                    ErrorKind::Receive => self.err_receive += 1,
                    ErrorKind::Length => self.err_length += 1,
                    ErrorKind::Response => self.err_response += 1,
                    ErrorKind::Exception | ErrorKind::Other => self.err_exception += 1,
                }
            }
            None => {
                self.total_response_time += record.response_time;
                self.total_received += record.content_size;

                let nanos = u64::try_from(record.response_time.as_nanos()).unwrap_or(u64::MAX);
                let written = self.response_time_samples.push(nanos);
                debug_assert!(written, "response time samples exceeded the request quota");
                if !written {
                    tracing::warn!(
                        capacity = self.response_time_samples.capacity(),
                        "Response time sample dropped, buffer full"
                    );
                }
            }
        }
    }

    pub(crate) fn set_execution_time(&mut self, elapsed: Duration) {
        self.total_execution_time = elapsed;
    }

    /// Response times of successful requests, in nanoseconds, arrival order
    pub fn response_time_samples(&self) -> &[u64] {
        self.response_time_samples.as_slice()
    }

    /// Every record received
    pub fn total_requests(&self) -> usize {
        self.total_requests
    }

    /// Records carrying an error
    pub fn total_failed_requests(&self) -> usize {
        self.total_failed_requests
    }

    /// Records without an error
    pub fn total_succeeded_requests(&self) -> usize {
        self.total_requests - self.total_failed_requests
    }

    /// Connect failures
    pub fn err_connect(&self) -> usize {
        self.err_connect
    }

    /// Receive failures
    pub fn err_receive(&self) -> usize {
        self.err_receive
    }

    /// Length mismatches
    pub fn err_length(&self) -> usize {
        self.err_length
    }

    /// Non-success responses
    pub fn err_response(&self) -> usize {
        self.err_response
    }

    /// Exceptions, including unclassified failures
    pub fn err_exception(&self) -> usize {
        self.err_exception
    }

    /// Sum of successful response times
    pub fn total_response_time(&self) -> Duration {
        self.total_response_time
    }

    /// Sum of bytes received by successful requests
    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    /// Wall-clock duration of the run, set when the run terminates
    pub fn total_execution_time(&self) -> Duration {
        self.total_execution_time
    }
}
