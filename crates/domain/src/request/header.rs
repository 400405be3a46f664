//! Single-key header entries

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::DomainError;

/// One header attached to a request, authored as a single-key mapping
/// (`{ "X-Auth-Token": "abc" }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HeaderEntry {
    /// Creates a new header entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Renders a scalar JSON value as a header value.
pub(crate) fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for HeaderEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(serde::de::Error::custom(DomainError::InvalidEntry {
                field: "set",
                found: map.len(),
            }));
        }
        let Some((name, value)) = map.into_iter().next() else {
            return Err(serde::de::Error::custom("empty header entry"));
        };
        let value = scalar_to_string(value).ok_or_else(|| {
            serde::de::Error::custom(format!("header '{name}' must have a scalar value"))
        })?;
        Ok(Self { name, value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_single_key_entry() {
        let entry: HeaderEntry = serde_json::from_value(json!({"X-Auth-Token": "abc"})).unwrap();
        assert_eq!(entry, HeaderEntry::new("X-Auth-Token", "abc"));
    }

    #[test]
    fn test_numeric_value_is_stringified() {
        let entry: HeaderEntry = serde_json::from_value(json!({"X-Retry": 3})).unwrap();
        assert_eq!(entry.value, "3");
    }

    #[test]
    fn test_multi_key_entry_rejected() {
        let result = serde_json::from_value::<HeaderEntry>(json!({"A": "1", "B": "2"}));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("exactly one key"), "{message}");
    }
}
