//! Application error types

use assay_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A case could not be registered; registration of its suite is aborted.
    #[error("cannot register '{case}' in suite '{suite}': {source}")]
    Registration {
        /// Suite being registered.
        suite: String,
        /// Offending case.
        case: String,
        /// Underlying shape error.
        #[source]
        source: DomainError,
    },
}

impl ApplicationError {
    /// Creates a registration error.
    #[must_use]
    pub fn registration(
        suite: impl Into<String>,
        case: impl Into<String>,
        source: DomainError,
    ) -> Self {
        Self::Registration {
            suite: suite.into(),
            case: case.into(),
            source,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
