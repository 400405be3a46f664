//! Value matchers used by header and body expectations.
//!
//! In data form a plain string is a literal and `{ regex: "..." }` is a
//! pattern. Body matchers additionally accept `{ json: ... }` for deep JSON
//! equality.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{DomainError, DomainResult};

/// Matches a single header value, literally or by pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact string equality.
    Literal(String),
    /// Regex search.
    Pattern(Regex),
}

impl Matcher {
    /// Creates a literal matcher.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Compiles a pattern matcher.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> DomainResult<Self> {
        compile(pattern).map(Self::Pattern)
    }

    /// Checks a value against this matcher.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Literal(expected) => value == expected,
            Self::Pattern(regex) => regex.is_match(value),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "\"{value}\""),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Matches a whole response body.
#[derive(Debug, Clone)]
pub enum BodyMatcher {
    /// Exact text equality.
    Text(String),
    /// Regex search over the body text.
    Pattern(Regex),
    /// Deep equality with the body parsed as JSON.
    Json(serde_json::Value),
}

impl BodyMatcher {
    /// Compiles a pattern body matcher.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> DomainResult<Self> {
        compile(pattern).map(Self::Pattern)
    }
}

impl fmt::Display for BodyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{text}'"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

impl PartialEq for BodyMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            (Self::Json(a), Self::Json(b)) => a == b,
            _ => false,
        }
    }
}

fn compile(pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMatcher {
    Literal(String),
    Pattern { regex: String },
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawMatcher::deserialize(deserializer)? {
            RawMatcher::Literal(value) => Ok(Self::Literal(value)),
            RawMatcher::Pattern { regex } => {
                Self::pattern(&regex).map_err(serde::de::Error::custom)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBodyMatcher {
    Text(String),
    Pattern { regex: String },
    Json { json: serde_json::Value },
}

impl<'de> Deserialize<'de> for BodyMatcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawBodyMatcher::deserialize(deserializer)? {
            RawBodyMatcher::Text(text) => Ok(Self::Text(text)),
            RawBodyMatcher::Pattern { regex } => {
                Self::pattern(&regex).map_err(serde::de::Error::custom)
            }
            RawBodyMatcher::Json { json } => Ok(Self::Json(json)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_literal_is_exact() {
        let matcher = Matcher::literal("application/json");
        assert!(matcher.matches("application/json"));
        assert!(!matcher.matches("application/json; charset=utf-8"));
    }

    #[test]
    fn test_pattern_searches() {
        let matcher = Matcher::pattern("json").unwrap();
        assert!(matcher.matches("application/json; charset=utf-8"));
        assert!(!matcher.matches("text/plain"));
        assert_eq!(matcher.to_string(), "/json/");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Matcher::pattern("(unclosed");
        assert!(matches!(result, Err(DomainError::InvalidPattern { .. })));
    }

    #[test]
    fn test_deserialize_matchers() {
        let literal: Matcher = serde_json::from_value(json!("text/html")).unwrap();
        assert_eq!(literal, Matcher::literal("text/html"));

        let pattern: Matcher = serde_json::from_value(json!({"regex": "^text/"})).unwrap();
        assert_eq!(pattern, Matcher::pattern("^text/").unwrap());
    }

    #[test]
    fn test_deserialize_body_matchers() {
        let text: BodyMatcher = serde_json::from_value(json!("ok")).unwrap();
        assert_eq!(text, BodyMatcher::Text("ok".to_string()));

        let body: BodyMatcher = serde_json::from_value(json!({"json": {"id": 1}})).unwrap();
        assert_eq!(body, BodyMatcher::Json(json!({"id": 1})));

        let pattern: BodyMatcher = serde_json::from_value(json!({"regex": "id"})).unwrap();
        assert_eq!(pattern.to_string(), "/id/");
    }
}
