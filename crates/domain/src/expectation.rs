//! Response expectations.
//!
//! An expectation is a single checked condition against an HTTP response.
//! HTTP cases attach them in a fixed order; the first one that fails is the
//! one reported.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::DomainError;
use crate::matcher::{BodyMatcher, Matcher};
use crate::response::ResponseSpec;

/// Signature of a custom response assertion.
pub type ResponseAssertFn = dyn Fn(&ResponseSpec) -> Result<(), String> + Send + Sync;

/// A custom assertion invoked with the full response.
#[derive(Clone)]
pub struct ResponseAssert(Arc<ResponseAssertFn>);

impl ResponseAssert {
    /// Wraps a closure as a response assertion.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ResponseSpec) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the assertion.
    ///
    /// # Errors
    ///
    /// Returns the assertion's own failure message.
    pub fn check(&self, response: &ResponseSpec) -> Result<(), String> {
        (self.0)(response)
    }
}

impl fmt::Debug for ResponseAssert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseAssert(..)")
    }
}

/// A condition attached to an HTTP request before it is sent.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Check response status code.
    Status(StatusExpectation),
    /// Check a response header.
    Header {
        /// Header name (case-insensitive).
        name: String,
        /// Expected value.
        matcher: Matcher,
    },
    /// Check the response body.
    Body(BodyMatcher),
    /// Run a custom assertion.
    Custom(ResponseAssert),
}

impl Expectation {
    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status(expected) => format!("status {}", expected.description()),
            Self::Header {
                name,
                matcher: Matcher::Literal(value),
            } => format!("header '{name}' equals \"{value}\""),
            Self::Header { name, matcher } => format!("header '{name}' matches {matcher}"),
            Self::Body(matcher) => format!("body {matcher}"),
            Self::Custom(_) => "custom assertion".to_string(),
        }
    }
}

/// What the `status` field of an HTTP case accepts.
///
/// In data form a number is an exact code, `{ min, max }` an inclusive
/// range and a list a set of accepted codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// A single code.
    Exact(u16),
    /// Inclusive range.
    Range {
        /// Lowest accepted code.
        min: u16,
        /// Highest accepted code.
        max: u16,
    },
    /// Any of the listed codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Whether `status` is accepted.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Short form used in failure messages and plan dumps.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => format!(
                "in [{}]",
                codes.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// Any 2xx code.
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Exactly `code`.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl From<u16> for StatusExpectation {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

/// One `expect` entry: a response field and the matcher its value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpectation {
    /// Response header name.
    pub field: String,
    /// Expected value.
    pub matcher: Matcher,
}

impl FieldExpectation {
    /// Creates a field expectation.
    #[must_use]
    pub fn new(field: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            field: field.into(),
            matcher,
        }
    }
}

impl<'de> Deserialize<'de> for FieldExpectation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<String, Matcher>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(serde::de::Error::custom(DomainError::InvalidEntry {
                field: "expect",
                found: map.len(),
            }));
        }
        map.into_iter()
            .next()
            .map(|(field, matcher)| Self { field, matcher })
            .ok_or_else(|| serde::de::Error::custom("empty expect entry"))
    }
}
