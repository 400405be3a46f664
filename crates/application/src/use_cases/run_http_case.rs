//! HTTP request builder use case.

use assay_domain::{CaseResult, Done, DomainResult, HttpCaseDescriptor, LintWarning};
use tracing::{debug, info, warn};

use crate::ports::{PendingRequest, RequestAssertionClient};
use crate::use_cases::request_plan::{PlanStep, RequestPlan};

/// Use case that turns HTTP case descriptors into request-assertion
/// pipelines and runs them.
pub struct HttpRequestBuilder<C: RequestAssertionClient> {
    client: C,
}

impl<C: RequestAssertionClient> HttpRequestBuilder<C> {
    /// Creates a new `HttpRequestBuilder` over `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Plans a merged descriptor, logging any lint findings.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor has no host or an unknown verb.
    pub fn plan(&self, descriptor: &HttpCaseDescriptor) -> DomainResult<RequestPlan> {
        self.lint(descriptor);
        RequestPlan::build(descriptor)
    }

    /// Logs the lint findings of `descriptor` as warnings and returns them.
    pub fn lint(&self, descriptor: &HttpCaseDescriptor) -> Vec<LintWarning> {
        let warnings = descriptor.lint();
        for warning in &warnings {
            warn!(case = %descriptor.display_name(), "{warning}");
        }
        warnings
    }

    /// Applies every step of `plan` and ends the request.
    ///
    /// Resolves to the first failing expectation, or to a transport failure
    /// when no response arrives.
    pub async fn execute(&self, plan: &RequestPlan) -> CaseResult {
        debug!(
            case = %plan.label,
            method = %plan.method,
            base = %plan.base,
            path = %plan.path,
            "Opening request"
        );
        let mut request = self.client.open(&plan.base, plan.method, &plan.path)?;
        for step in &plan.steps {
            debug!(case = %plan.label, step = %step.describe(), "Applying step");
            request = match step {
                PlanStep::Auth { user, pass } => request.auth(user, pass),
                PlanStep::Header { name, value } => request.header(name, value),
                PlanStep::Expect(expectation) => request.expect(expectation.clone()),
                PlanStep::Send(payload) => request.send(payload.clone()),
            };
        }
        request.end().await
    }

    /// Executes `plan` and completes `done` with the outcome.
    pub async fn run_http_case(&self, plan: &RequestPlan, done: Done) {
        let result = self.execute(plan).await;
        match &result {
            Ok(()) => info!(case = %plan.label, "HTTP case passed"),
            Err(failure) => info!(case = %plan.label, error = %failure, "HTTP case failed"),
        }
        done.complete(result);
    }
}
