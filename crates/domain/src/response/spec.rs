//! Received responses
//!
//! A [`ResponseSpec`] is what every attached expectation of an HTTP case is
//! checked against, in attachment order.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Numeric status of a response.
///
/// Displays as `201 "Created"`, the form expectation failures cite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

const REASONS: &[(u16, &str)] = &[
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (204, "No Content"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (409, "Conflict"),
    (415, "Unsupported Media Type"),
    (422, "Unprocessable Entity"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
];

impl StatusCode {
    /// Wraps a numeric status.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Numeric value.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Whether the status is in the 2xx class.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.0, 200..=299)
    }

    /// Reason phrase, or the class name for codes without a known phrase.
    #[must_use]
    pub fn reason_phrase(&self) -> &'static str {
        REASONS
            .iter()
            .find(|(code, _)| *code == self.0)
            .map_or_else(
                || match self.0 / 100 {
                    1 => "Informational",
                    2 => "Success",
                    3 => "Redirection",
                    4 => "Client Error",
                    5 => "Server Error",
                    _ => "Unknown",
                },
                |(_, reason)| reason,
            )
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A response as seen by expectations and custom assertions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// Numeric status.
    pub status: u16,
    /// Reason phrase of `status`.
    pub status_text: String,
    /// Header fields; names keep the case the client reported.
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8, lossily.
    pub body: String,
    /// Time from send to the last body byte.
    pub duration: Duration,
    /// Value of the `Content-Type` field, if any.
    pub content_type: Option<String>,
}

impl ResponseSpec {
    /// Builds a response from what the client received.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let status = status.into();
        let mut response = Self {
            status: status.as_u16(),
            status_text: status.reason_phrase().to_string(),
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
            duration,
            content_type: None,
        };
        response.content_type = response.get_header("Content-Type").cloned();
        response
    }

    /// Status as a [`StatusCode`].
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Body parsed as JSON, if it is JSON.
    #[must_use]
    pub fn body_as_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Header field by name, ignoring ASCII case.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(field, value)| field.eq_ignore_ascii_case(name).then_some(value))
    }
}
