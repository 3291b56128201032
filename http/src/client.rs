//! reqwest-backed request client

use std::sync::OnceLock;

use async_trait::async_trait;
use hitbench_core::{RequestClient, RequestError};
use reqwest::{Client, Method};

use crate::target::{HttpConfigError, HttpTarget};

/// Issues the configured request against the target
///
/// Failure classification:
/// - connection could not be established: `Connect`
/// - timeout, or the response could not be read: `Receive`
/// - non-2xx status: `Response`
/// - body length differs from the first successful response: `Length`
/// - anything else: `Exception`
#[derive(Debug)]
pub struct HttpClient {
    inner: Client,
    target: HttpTarget,
    target_text: String,
    expected_length: OnceLock<u64>,
}

impl HttpClient {
    /// Build a client for `target`
    pub fn new(target: HttpTarget) -> Result<Self, HttpConfigError> {
        let mut builder = Client::builder()
            .timeout(target.timeout)
            .user_agent(concat!("hitbench/", env!("CARGO_PKG_VERSION")));
        if !target.keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }

        tracing::debug!(
            url = %target.url,
            method = %target.method,
            keep_alive = target.keep_alive,
            "building http client"
        );

        Ok(Self {
            inner: builder.build()?,
            target_text: target.url.to_string(),
            target,
            expected_length: OnceLock::new(),
        })
    }

    /// Body length of the first successful response, once known
    pub fn expected_length(&self) -> Option<u64> {
        self.expected_length.get().copied()
    }

    fn check_length(&self, actual: u64) -> Result<(), RequestError> {
        if self.target.accept_variable_length || self.target.method == Method::HEAD {
            return Ok(());
        }

        let expected = *self.expected_length.get_or_init(|| actual);
        if expected != actual {
            return Err(RequestError::Length { expected, actual });
        }
        Ok(())
    }
}

#[async_trait]
impl RequestClient for HttpClient {
    fn target(&self) -> &str {
        &self.target_text
    }

    async fn execute(&self) -> Result<u64, RequestError> {
        let mut request = self
            .inner
            .request(self.target.method.clone(), self.target.url.clone())
            .headers(self.target.headers.clone());
        if let Some(body) = &self.target.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::Receive(e.to_string()))?;

        if !status.is_success() {
            return Err(RequestError::Response {
                status: status.as_u16(),
            });
        }

        let received = body.len() as u64;
        self.check_length(received)?;

        Ok(received)
    }
}

fn classify_send_error(e: reqwest::Error) -> RequestError {
    if e.is_connect() {
        RequestError::Connect(e.to_string())
    } else if e.is_timeout() || e.is_request() || e.is_body() {
        RequestError::Receive(e.to_string())
    } else {
        RequestError::Exception(e.to_string())
    }
}
