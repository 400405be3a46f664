//! HTTP verb enumeration

use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Verbs an HTTP case may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
}

impl HttpMethod {
    /// Verbs in the order verb-named payload properties are looked up.
    #[must_use]
    pub const fn inference_order() -> &'static [Self] {
        &[Self::Post, Self::Put, Self::Delete, Self::Patch, Self::Get]
    }

    /// Returns the method as an upper-case static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Returns the name of the descriptor property carrying this verb's payload.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
        }
    }

    /// Parses a verb as written by a suite author: case-insensitive, `del` is `delete`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedMethod`] for anything else.
    pub fn from_verb(verb: &str) -> DomainResult<Self> {
        match verb.trim().to_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "del" | "delete" => Ok(Self::Delete),
            "patch" => Ok(Self::Patch),
            _ => Err(DomainError::UnsupportedMethod(verb.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::from_verb(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_from_str() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Put".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
    }

    #[test]
    fn test_del_is_delete() {
        assert_eq!(HttpMethod::from_verb("del").unwrap(), HttpMethod::Delete);
        assert_eq!(HttpMethod::from_verb("DEL").unwrap(), HttpMethod::Delete);
        assert_eq!(HttpMethod::from_verb("delete").unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_invalid_method() {
        let result = "OPTIONS".parse::<HttpMethod>();
        assert_eq!(
            result,
            Err(DomainError::UnsupportedMethod("OPTIONS".to_string()))
        );
    }

    #[test]
    fn test_payload_properties_follow_inference_order() {
        let names: Vec<_> = HttpMethod::inference_order()
            .iter()
            .map(|m| m.property_name())
            .collect();
        assert_eq!(names, vec!["post", "put", "delete", "patch", "get"]);
    }
}
