//! Assertion invoker.
//!
//! Turns a tagged [`Assert`] into a host [`CaseBody`] and drives a body to
//! its result.

use assay_domain::{Assert, BoxFuture, CaseFailure, CaseResult, Done, Fixture};
use tokio::sync::oneshot;

use crate::ports::{CaseBody, CaseReturn};

/// Use case for invoking case assertions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionInvoker;

impl AssertionInvoker {
    /// Creates a new `AssertionInvoker`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Wraps `assert` into a case body bound to `fixture`.
    ///
    /// Sync assertions never see a completion signal. Async assertions get a
    /// fresh [`Done`] per run, preceded by the fixture for the data form.
    #[must_use]
    pub fn prepare(&self, assert: &Assert, fixture: &Fixture) -> CaseBody {
        let fixture = fixture.clone();
        match assert.clone() {
            Assert::Sync(f) => CaseBody::Sync(Box::new(move || CaseReturn::Ready(f(&fixture)))),
            Assert::Deferred(f) => {
                CaseBody::Sync(Box::new(move || CaseReturn::Future(f(fixture))))
            }
            Assert::AsyncPlain(f) => CaseBody::Async(Box::new(move |done| {
                f(done);
                settled()
            })),
            Assert::AsyncWithData(f) => CaseBody::Async(Box::new(move |done| {
                f(fixture, done);
                settled()
            })),
        }
    }

    /// Runs `body` to completion.
    ///
    /// An async body finishes when its [`Done`] is completed. A signal that
    /// is dropped uncompleted yields [`CaseFailure::Abandoned`].
    pub async fn complete(&self, body: CaseBody) -> CaseResult {
        match body {
            CaseBody::Sync(run) => match run() {
                CaseReturn::Ready(result) => result,
                CaseReturn::Future(future) => future.await,
            },
            CaseBody::Async(run) => {
                let (tx, rx) = oneshot::channel();
                let done = Done::new(move |result| {
                    let _ = tx.send(result);
                });
                run(done).await;
                rx.await.unwrap_or(Err(CaseFailure::Abandoned))
            }
        }
    }
}

fn settled() -> BoxFuture<()> {
    Box::pin(std::future::ready(()))
}
