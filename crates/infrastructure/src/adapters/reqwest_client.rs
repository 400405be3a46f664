//! Request-assertion client implementation using reqwest.
//!
//! This adapter implements the `RequestAssertionClient` port. A pending
//! request collects its steps and only touches the network when it is ended.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use assay_application::ports::{HttpClientError, PendingRequest, RequestAssertionClient};
use assay_domain::{CaseResult, Expectation, HttpMethod, ResponseSpec};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::testing::ExpectationChecker;

/// Request-assertion client backed by `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestAssertionClient {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestAssertionClient {
    /// Creates a client whose requests time out after `timeout_ms`.
    ///
    /// Default configuration:
    /// - Redirects: not followed, so a 3xx response is checked as received
    /// - TLS verification: enabled
    /// - User-Agent: "Assay/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout_ms: u64) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("Assay/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins a base URL and a path with exactly one slash between them.
    fn join_url(base: &str, path: &str) -> String {
        let base = base.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_builder() {
            return HttpClientError::InvalidRequest(error.to_string());
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        HttpClientError::Other(error.to_string())
    }
}

impl RequestAssertionClient for ReqwestAssertionClient {
    type Request = ReqwestPendingRequest;

    fn open(
        &self,
        base: &str,
        method: HttpMethod,
        path: &str,
    ) -> Result<Self::Request, HttpClientError> {
        let url = Self::join_url(base, path);
        let url = Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

        Ok(ReqwestPendingRequest {
            client: self.client.clone(),
            timeout_ms: self.timeout_ms,
            method,
            url,
            auth: None,
            headers: Vec::new(),
            expectations: Vec::new(),
            payload: None,
        })
    }
}

/// A request being assembled by a plan.
pub struct ReqwestPendingRequest {
    client: Client,
    timeout_ms: u64,
    method: HttpMethod,
    url: Url,
    auth: Option<(String, String)>,
    headers: Vec<(String, String)>,
    expectations: Vec<Expectation>,
    payload: Option<Value>,
}

impl PendingRequest for ReqwestPendingRequest {
    fn auth(mut self, user: &str, pass: &str) -> Self {
        self.auth = Some((user.to_string(), pass.to_string()));
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    fn send(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    async fn end(self) -> CaseResult {
        let timeout_ms = self.timeout_ms;
        let start = Instant::now();

        let mut builder = self
            .client
            .request(
                ReqwestAssertionClient::to_reqwest_method(self.method),
                self.url.clone(),
            )
            .timeout(Duration::from_millis(timeout_ms));

        if let Some((user, pass)) = &self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder = match self.payload {
            Some(Value::String(text)) => builder.body(text),
            Some(payload) => builder.json(&payload),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ReqwestAssertionClient::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
            .to_vec();
        let response = ResponseSpec::new(status, headers, body, start.elapsed());

        debug!(
            url = %self.url,
            status,
            duration = ?response.duration,
            "Response received"
        );

        ExpectationChecker::new().check_all(&self.expectations, &response)
    }
}

/// Flattens response headers, joining repeated fields with `", "` in the
/// order they were received.
fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in map {
        let value = value.to_str().unwrap_or("<binary>");
        headers
            .entry(name.to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}
