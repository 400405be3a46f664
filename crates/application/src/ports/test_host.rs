//! Host runner port

use assay_domain::{BoxFuture, CaseResult, Done};

use crate::ApplicationResult;

/// What a synchronous case body hands back.
pub enum CaseReturn {
    /// The case already finished.
    Ready(CaseResult),
    /// The host must await this future to finish the case.
    Future(BoxFuture<CaseResult>),
}

/// Executable body of a registered case.
pub enum CaseBody {
    /// Runs to completion when called; never receives a completion signal.
    Sync(Box<dyn FnOnce() -> CaseReturn + Send>),
    /// Receives the completion signal; the case finishes when it is completed.
    Async(Box<dyn FnOnce(Done) -> BoxFuture<()> + Send>),
}

impl CaseBody {
    /// Returns true for bodies that receive a completion signal.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl std::fmt::Debug for CaseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("CaseBody::Sync(..)"),
            Self::Async(_) => f.write_str("CaseBody::Async(..)"),
        }
    }
}

/// Declares the contents of a group against the host.
pub type Declare<'a> = dyn FnMut(&mut dyn TestHost) -> ApplicationResult<()> + 'a;

/// Port for the test runner cases are registered with.
///
/// Registration never runs a case: bodies are stored and executed later on
/// the host's own schedule.
pub trait TestHost {
    /// Declares a named group. `declare` registers the group's contents
    /// synchronously. If it fails the group is discarded and the error returned.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `declare`.
    fn group(&mut self, label: &str, declare: &mut Declare<'_>) -> ApplicationResult<()>;

    /// Declares a case.
    fn case(&mut self, description: &str, body: CaseBody);

    /// Declares a case that is reported as pending and never run.
    fn pending(&mut self, description: &str);
}
