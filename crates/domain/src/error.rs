//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building or validating descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A descriptor matches none of the known shapes.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// The HTTP verb is not one of get/post/put/delete/patch.
    #[error("unsupported HTTP verb: {0}")]
    UnsupportedMethod(String),

    /// A regex pattern failed to compile.
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// A single-key entry (`set` / `expect`) carried zero or several keys.
    #[error("{field} entries must have exactly one key, found {found}")]
    InvalidEntry {
        /// Field holding the entry.
        field: &'static str,
        /// Number of keys found.
        found: usize,
    },

    /// An HTTP case has no host, neither on itself nor in the fixture.
    #[error("HTTP case '{0}' has no host")]
    MissingHost(String),

    /// Fixture data could not be applied to an HTTP case.
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
