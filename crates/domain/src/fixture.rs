//! Shared fixture data.
//!
//! A fixture is an arbitrary mapping handed to every case of a suite subtree.
//! It is immutable once built and cheap to clone.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Key marking every case of a suite as pending.
pub const PENDING_KEY: &str = "pending";

/// Read-only data shared by the cases of a suite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixture(Arc<Map<String, Value>>);

impl Fixture {
    /// Creates a fixture from a JSON object.
    #[must_use]
    pub fn new(values: Map<String, Value>) -> Self {
        Self(Arc::new(values))
    }

    /// Creates an empty fixture.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a fixture from any JSON value; `null` is the empty fixture.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFixture`] when the value is neither an
    /// object nor `null`.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            Value::Null => Ok(Self::empty()),
            other => Err(DomainError::InvalidFixture(format!(
                "expected a mapping, found {other}"
            ))),
        }
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Gets a string value by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns true when the fixture marks its cases as pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.get(PENDING_KEY).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns the underlying mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true if the fixture holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a fixture where `defaults` fill in the keys this one lacks.
    #[must_use]
    pub fn with_defaults(&self, defaults: &Map<String, Value>) -> Self {
        if defaults.keys().all(|key| self.0.contains_key(key)) {
            return self.clone();
        }
        let mut merged = defaults.clone();
        for (key, value) in self.0.iter() {
            merged.insert(key.clone(), value.clone());
        }
        Self::new(merged)
    }
}

impl From<Map<String, Value>> for Fixture {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

impl<'de> Deserialize<'de> for Fixture {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
