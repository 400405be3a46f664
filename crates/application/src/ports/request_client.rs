//! Request-assertion client port

use std::future::Future;

use assay_domain::{CaseFailure, CaseResult, Expectation, HttpMethod};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a request-assertion client before any expectation runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The host/path pair does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header or payload could not be attached.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host name.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// Nothing is listening on the target.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Host name.
        host: String,
        /// Port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

impl From<HttpClientError> for CaseFailure {
    fn from(error: HttpClientError) -> Self {
        let message = error.to_string();
        match error {
            HttpClientError::InvalidUrl(_) | HttpClientError::InvalidRequest(_) => {
                Self::Request(message)
            }
            _ => Self::Transport(message),
        }
    }
}

/// Port for opening request-assertion pipelines.
///
/// Opening a request binds the base URL, the verb and the path. Everything
/// else is attached to the returned [`PendingRequest`] before it is ended.
pub trait RequestAssertionClient: Send + Sync {
    /// Request type produced by this client.
    type Request: PendingRequest;

    /// Opens a request for `method` on `base` + `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    fn open(
        &self,
        base: &str,
        method: HttpMethod,
        path: &str,
    ) -> Result<Self::Request, HttpClientError>;
}

/// A request under construction. Every call appends one step; steps are
/// applied in call order.
pub trait PendingRequest: Send + Sized {
    /// Attaches basic auth.
    #[must_use]
    fn auth(self, user: &str, pass: &str) -> Self;

    /// Attaches one header.
    #[must_use]
    fn header(self, name: &str, value: &str) -> Self;

    /// Attaches one expectation, checked after the response arrives in
    /// attachment order.
    #[must_use]
    fn expect(self, expectation: Expectation) -> Self;

    /// Sets the request payload.
    #[must_use]
    fn send(self, payload: Value) -> Self;

    /// Sends the request and checks the attached expectations, reporting the
    /// first one that fails.
    fn end(self) -> impl Future<Output = CaseResult> + Send;
}
