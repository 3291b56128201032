//! Target description and validation

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use thiserror::Error;

/// Target configuration error
#[derive(Debug, Error)]
pub enum HttpConfigError {
    /// URL could not be parsed or is not http(s)
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// Offending input
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Header is not of the form `Name: value`
    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    /// Unknown HTTP method
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    /// Timeout must be positive
    #[error("invalid timeout: {0:?}")]
    InvalidTimeout(Duration),

    /// The underlying client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// What to request, and how
#[derive(Debug, Clone)]
pub struct HttpTarget {
    /// Request URL
    pub url: Url,
    /// Request method
    pub method: Method,
    /// Extra request headers
    pub headers: HeaderMap,
    /// Request body, sent with every request
    pub body: Option<Vec<u8>>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Reuse connections between requests
    pub keep_alive: bool,
    /// Accept responses whose length differs from the first one
    pub accept_variable_length: bool,
}

impl HttpTarget {
    /// GET `url` with a 30 second timeout and no keep-alive
    pub fn new(url: &str) -> Result<Self, HttpConfigError> {
        let parsed = Url::parse(url).map_err(|e| HttpConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            url: parsed,
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            keep_alive: false,
            accept_variable_length: false,
        })
    }

    /// Set the method by name (case-insensitive)
    pub fn with_method(mut self, method: &str) -> Result<Self, HttpConfigError> {
        self.method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| HttpConfigError::InvalidMethod(method.to_string()))?;
        Ok(self)
    }

    /// Add a header
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, HttpConfigError> {
        if timeout.is_zero() {
            return Err(HttpConfigError::InvalidTimeout(timeout));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Enable or disable connection reuse
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Accept responses of varying length
    pub fn with_variable_length(mut self, accept: bool) -> Self {
        self.accept_variable_length = accept;
        self
    }
}

/// Parse a `Name: value` header line
pub fn parse_header(line: &str) -> Result<(HeaderName, HeaderValue), HttpConfigError> {
    let invalid = || HttpConfigError::InvalidHeader(line.to_string());

    let (name, value) = line.split_once(':').ok_or_else(invalid)?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| invalid())?;
    let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;

    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_target_defaults() {
        let target = HttpTarget::new("http://localhost:8080/health").unwrap();
        assert_eq!(target.method, Method::GET);
        assert_eq!(target.timeout, Duration::from_secs(30));
        assert!(!target.keep_alive);
        assert!(target.body.is_none());
        assert_eq!(target.url.path(), "/health");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            HttpTarget::new("not a url"),
            Err(HttpConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpTarget::new("ftp://example.com/"),
            Err(HttpConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_method_case_insensitive() {
        let target = HttpTarget::new("http://localhost/")
            .unwrap()
            .with_method("post")
            .unwrap();
        assert_eq!(target.method, Method::POST);
    }

    #[test]
    fn test_invalid_method() {
        let result = HttpTarget::new("http://localhost/")
            .unwrap()
            .with_method("GE T");
        assert!(matches!(result, Err(HttpConfigError::InvalidMethod(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = HttpTarget::new("http://localhost/")
            .unwrap()
            .with_timeout(Duration::ZERO);
        assert!(matches!(result, Err(HttpConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("X-Request-Id:  abc123 ").unwrap();
        assert_eq!(name.as_str(), "x-request-id");
        assert_eq!(value.to_str().unwrap(), "abc123");
    }

    #[test]
    fn test_parse_header_invalid() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header("bad name: value").is_err());
    }
}
