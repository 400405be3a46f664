//! Case outcomes

use thiserror::Error;

/// Why a case failed. Every failure reaches the host through the case's
/// single completion channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaseFailure {
    /// A plain assertion reported failure.
    #[error("{0}")]
    Assertion(String),

    /// An attached HTTP expectation did not hold.
    #[error("{message}")]
    Expectation {
        /// Description of the failing expectation.
        expectation: String,
        /// What was expected and what was received.
        message: String,
    },

    /// The request could not be built (bad URL, bad header value...).
    #[error("request error: {0}")]
    Request(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The host gave up waiting for the case.
    #[error("timeout of {0}ms exceeded")]
    Timeout(u64),

    /// The assertion panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The completion signal was dropped without being invoked.
    #[error("completion signal dropped without being invoked")]
    Abandoned,
}

impl CaseFailure {
    /// Creates an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    /// Creates an expectation failure.
    #[must_use]
    pub fn expectation(expectation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Expectation {
            expectation: expectation.into(),
            message: message.into(),
        }
    }

    /// Returns true for failures that happened before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Request(_))
    }
}

/// Result of running one case.
pub type CaseResult = Result<(), CaseFailure>;
