//! Per-request outcome records
//!
//! Workers produce exactly one [`OutcomeRecord`] per completed attempt and
//! move it into the collector channel. The monitor is the only consumer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classification carried by an [`OutcomeRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Could not establish a connection to the target
    Connect,
    /// Connection established but the response could not be read
    Receive,
    /// Body length differed from the first successful response
    Length,
    /// Target answered with a non-success status
    Response,
    /// Any other failure while issuing the request
    Exception,
    /// Unclassified failure; counted as [`ErrorKind::Exception`]
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Connect => "connect",
            ErrorKind::Receive => "receive",
            ErrorKind::Length => "length",
            ErrorKind::Response => "response",
            ErrorKind::Exception => "exception",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Failure returned by a [`RequestClient`](crate::traits::RequestClient)
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection refused, DNS failure, TLS handshake failure
    #[error("connect error: {0}")]
    Connect(String),

    /// Timed out or failed while reading the response
    #[error("receive error: {0}")]
    Receive(String),

    /// Body length mismatch
    #[error("length error: expected {expected} bytes, received {actual}")]
    Length {
        /// Advertised length
        expected: u64,
        /// Bytes actually read
        actual: u64,
    },

    /// Non-success HTTP status
    #[error("response error: status {status}")]
    Response {
        /// HTTP status code
        status: u16,
    },

    /// Anything else
    #[error("exception: {0}")]
    Exception(String),
}

impl RequestError {
    /// Classify this error for statistics
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Connect(_) => ErrorKind::Connect,
            RequestError::Receive(_) => ErrorKind::Receive,
            RequestError::Length { .. } => ErrorKind::Length,
            RequestError::Response { .. } => ErrorKind::Response,
            RequestError::Exception(_) => ErrorKind::Exception,
        }
    }
}

/// Result of one request attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Failure classification, `None` on success
    pub error: Option<ErrorKind>,

    /// Time from issue to completion; meaningful only on success
    pub response_time: Duration,

    /// Bytes received; meaningful only on success
    pub content_size: u64,
}

impl OutcomeRecord {
    /// A successful attempt
    pub fn success(response_time: Duration, content_size: u64) -> Self {
        Self {
            error: None,
            response_time,
            content_size,
        }
    }

    /// A failed attempt
    pub fn failure(kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            response_time: Duration::ZERO,
            content_size: 0,
        }
    }

    /// Build a record from a client result and the measured attempt time
    pub fn from_result(result: Result<u64, RequestError>, elapsed: Duration) -> Self {
        match result {
            Ok(content_size) => Self::success(elapsed, content_size),
            Err(e) => Self::failure(e.kind()),
        }
    }

    /// Whether the attempt failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
