//! Suite and case descriptors.
//!
//! A descriptor is exactly one of a nested suite, a plain case with an
//! assertion, or an HTTP case. The variant is fixed when the descriptor is
//! built; nothing downstream inspects field presence to guess it.

mod http;
mod lint;

pub use http::HttpCaseDescriptor;
pub use lint::LintWarning;

use serde_json::Value;

use crate::assert::Assert;
use crate::error::{DomainError, DomainResult};

/// A named group of descriptors.
#[derive(Debug, Clone)]
pub struct SuiteDescriptor {
    /// Group label.
    pub label: String,
    /// Nested descriptors, in registration order.
    pub tests: Vec<Descriptor>,
}

/// A plain case run through its assertion.
#[derive(Debug, Clone)]
pub struct CaseDescriptor {
    /// Case description.
    pub desc: String,
    /// Tagged assertion.
    pub assert: Assert,
}

/// One entry of a suite.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Nested suite.
    Suite(SuiteDescriptor),
    /// Plain sync or async case.
    Case(CaseDescriptor),
    /// HTTP request-and-assertion case.
    Http(Box<HttpCaseDescriptor>),
}

impl Descriptor {
    /// Builds a nested suite.
    #[must_use]
    pub fn suite(label: impl Into<String>, tests: Vec<Self>) -> Self {
        Self::Suite(SuiteDescriptor {
            label: label.into(),
            tests,
        })
    }

    /// Builds a plain case.
    #[must_use]
    pub fn case(desc: impl Into<String>, assert: Assert) -> Self {
        Self::Case(CaseDescriptor {
            desc: desc.into(),
            assert,
        })
    }

    /// Builds an HTTP case.
    #[must_use]
    pub fn http(descriptor: HttpCaseDescriptor) -> Self {
        Self::Http(Box::new(descriptor))
    }

    /// Label or description shown by the host.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Suite(suite) => suite.label.clone(),
            Self::Case(case) => case.desc.clone(),
            Self::Http(http) => http.display_name(),
        }
    }

    /// Builds a descriptor from its data form.
    ///
    /// An object with `tests` is a suite, an object with `path` is an HTTP
    /// case. Plain cases carry code and have no data form.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDescriptor`] when the value matches no
    /// shape, matches both, or an HTTP case fails to deserialize.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(DomainError::InvalidDescriptor(format!(
                    "expected a mapping, found {other}"
                )));
            }
        };
        let label = map
            .get("label")
            .or_else(|| map.get("desc"))
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();

        let has_path = map.contains_key("path");
        match (map.get("tests").cloned(), has_path) {
            (Some(_), true) => Err(DomainError::InvalidDescriptor(format!(
                "'{label}' has both `tests` and `path`"
            ))),
            (Some(tests), false) => {
                if let Some(key) = map
                    .keys()
                    .find(|key| !matches!(key.as_str(), "label" | "desc" | "tests"))
                {
                    return Err(DomainError::InvalidDescriptor(format!(
                        "suite '{label}' has unexpected field `{key}`"
                    )));
                }
                let Value::Array(entries) = tests else {
                    return Err(DomainError::InvalidDescriptor(format!(
                        "suite '{label}': `tests` must be a sequence"
                    )));
                };
                let tests = entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        Self::from_value(entry).map_err(|e| match e {
                            DomainError::InvalidDescriptor(msg) => DomainError::InvalidDescriptor(
                                format!("{label} > #{index}: {msg}"),
                            ),
                            other => other,
                        })
                    })
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(Self::suite(label, tests))
            }
            (None, true) => serde_json::from_value::<HttpCaseDescriptor>(Value::Object(map))
                .map(Self::http)
                .map_err(|e| DomainError::InvalidDescriptor(format!("'{label}': {e}"))),
            (None, false) => Err(DomainError::InvalidDescriptor(format!(
                "'{label}' has neither `tests` nor `path`"
            ))),
        }
    }
}

impl From<HttpCaseDescriptor> for Descriptor {
    fn from(descriptor: HttpCaseDescriptor) -> Self {
        Self::http(descriptor)
    }
}
