//! Case dispatcher use case.

use std::sync::Arc;

use assay_domain::{CaseDescriptor, Descriptor, DomainResult, Fixture, HttpCaseDescriptor, LintWarning};
use tracing::debug;

use crate::ports::{CaseBody, RequestAssertionClient, TestHost};
use crate::use_cases::invoke_assertion::AssertionInvoker;
use crate::use_cases::run_http_case::HttpRequestBuilder;

/// Use case that registers leaf descriptors with the host.
pub struct CaseDispatcher<C: RequestAssertionClient> {
    http: Arc<HttpRequestBuilder<C>>,
    invoker: AssertionInvoker,
}

impl<C: RequestAssertionClient + 'static> CaseDispatcher<C> {
    /// Creates a new `CaseDispatcher` sending HTTP cases through `client`.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            http: Arc::new(HttpRequestBuilder::new(client)),
            invoker: AssertionInvoker::new(),
        }
    }

    /// Registers a plain case. Its kind decides whether the host hands it a
    /// completion signal.
    pub fn dispatch_case(&self, host: &mut dyn TestHost, case: &CaseDescriptor, fixture: &Fixture) {
        debug!(case = %case.desc, kind = ?case.assert.kind(), "Registering case");
        host.case(&case.desc, self.invoker.prepare(&case.assert, fixture));
    }

    /// Registers a leaf as pending. HTTP leaves are still linted, since
    /// they are never planned.
    pub fn dispatch_pending(&self, host: &mut dyn TestHost, leaf: &Descriptor) -> Vec<LintWarning> {
        let warnings = match leaf {
            Descriptor::Http(http) => self.http.lint(http),
            _ => Vec::new(),
        };
        host.pending(&leaf.label());
        warnings
    }

    /// Plans a merged HTTP case and registers it as an async case.
    ///
    /// # Errors
    ///
    /// Returns an error when the case cannot be planned; nothing is
    /// registered in that case.
    pub fn dispatch_http(
        &self,
        host: &mut dyn TestHost,
        descriptor: &HttpCaseDescriptor,
    ) -> DomainResult<()> {
        let plan = self.http.plan(descriptor)?;
        debug!(case = %plan.label, steps = plan.steps.len(), "Registering HTTP case");
        let label = plan.label.clone();
        let builder = Arc::clone(&self.http);
        host.case(
            &label,
            CaseBody::Async(Box::new(move |done| {
                Box::pin(async move { builder.run_http_case(&plan, done).await })
            })),
        );
        Ok(())
    }
}
