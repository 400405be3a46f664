//! Case assertions and the completion signal.
//!
//! The kind of an assertion is chosen explicitly by the suite author and is
//! the only thing that decides how a case is run.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::fixture::Fixture;
use crate::outcome::{CaseFailure, CaseResult};

/// Boxed future returned by deferred assertions and async case bodies.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type SyncFn = dyn Fn(&Fixture) -> CaseResult + Send + Sync;
type DeferredFn = dyn Fn(Fixture) -> BoxFuture<CaseResult> + Send + Sync;
type AsyncPlainFn = dyn Fn(Done) + Send + Sync;
type AsyncWithDataFn = dyn Fn(Fixture, Done) + Send + Sync;

/// How a case is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// Completes when the assertion returns.
    Sync,
    /// Receives only the completion signal.
    AsyncPlain,
    /// Receives the fixture, then the completion signal.
    AsyncWithData,
}

/// A tagged case assertion.
#[derive(Clone)]
pub enum Assert {
    /// Called with the fixture; the case completes on return.
    Sync(Arc<SyncFn>),
    /// Called with the fixture; the case completes when the returned future does.
    Deferred(Arc<DeferredFn>),
    /// Called with the completion signal only.
    AsyncPlain(Arc<AsyncPlainFn>),
    /// Called with the fixture and the completion signal.
    AsyncWithData(Arc<AsyncWithDataFn>),
}

impl Assert {
    /// A synchronous assertion.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Fixture) -> CaseResult + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// A synchronous assertion that hands back a future for the host to await.
    pub fn returning_future<F, Fut>(f: F) -> Self
    where
        F: Fn(Fixture) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CaseResult> + Send + 'static,
    {
        Self::Deferred(Arc::new(move |fixture| Box::pin(f(fixture))))
    }

    /// An asynchronous assertion that only receives the completion signal.
    pub fn async_plain<F>(f: F) -> Self
    where
        F: Fn(Done) + Send + Sync + 'static,
    {
        Self::AsyncPlain(Arc::new(f))
    }

    /// An asynchronous assertion that receives the fixture and the completion signal.
    pub fn async_with_data<F>(f: F) -> Self
    where
        F: Fn(Fixture, Done) + Send + Sync + 'static,
    {
        Self::AsyncWithData(Arc::new(f))
    }

    /// Returns the kind of this assertion.
    #[must_use]
    pub const fn kind(&self) -> CaseKind {
        match self {
            Self::Sync(_) | Self::Deferred(_) => CaseKind::Sync,
            Self::AsyncPlain(_) => CaseKind::AsyncPlain,
            Self::AsyncWithData(_) => CaseKind::AsyncWithData,
        }
    }
}

impl fmt::Debug for Assert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sync(_) => "Sync",
            Self::Deferred(_) => "Deferred",
            Self::AsyncPlain(_) => "AsyncPlain",
            Self::AsyncWithData(_) => "AsyncWithData",
        };
        write!(f, "Assert::{name}(..)")
    }
}

/// Completion signal of an async case.
///
/// Completing consumes the signal, so it is invoked at most once. A signal
/// dropped without completing is observed by the host as
/// [`CaseFailure::Abandoned`].
pub struct Done {
    complete: Box<dyn FnOnce(CaseResult) + Send>,
}

impl Done {
    /// Creates a signal that forwards the case result to `complete`.
    pub fn new<F>(complete: F) -> Self
    where
        F: FnOnce(CaseResult) + Send + 'static,
    {
        Self {
            complete: Box::new(complete),
        }
    }

    /// Reports the case result.
    pub fn complete(self, result: CaseResult) {
        (self.complete)(result);
    }

    /// Reports success.
    pub fn pass(self) {
        self.complete(Ok(()));
    }

    /// Reports an assertion failure.
    pub fn fail(self, message: impl Into<String>) {
        self.complete(Err(CaseFailure::assertion(message)));
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Done(..)")
    }
}
