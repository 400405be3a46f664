//! Typed request pipeline built from an HTTP case descriptor.

use assay_domain::{
    BodyMatcher, DomainResult, Expectation, HttpCaseDescriptor, HttpMethod, Matcher,
};
use serde_json::Value;

/// One call applied to a pending request.
#[derive(Debug, Clone)]
pub enum PlanStep {
    /// Basic auth.
    Auth {
        /// User name.
        user: String,
        /// Password.
        pass: String,
    },
    /// Request header.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// Expectation checked once the response arrives.
    Expect(Expectation),
    /// Request payload.
    Send(Value),
}

impl PlanStep {
    /// Short description used in logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Auth { user, .. } => format!("auth {user}"),
            Self::Header { name, value } => format!("header {name}: {value}"),
            Self::Expect(expectation) => format!("expect {}", expectation.description()),
            Self::Send(payload) => format!("send {payload}"),
        }
    }
}

/// A resolved request: where to send it and the ordered steps to apply.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    /// Case name shown by the host.
    pub label: String,
    /// Base URL.
    pub base: String,
    /// Resolved verb.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Steps in application order.
    pub steps: Vec<PlanStep>,
}

impl RequestPlan {
    /// Builds the plan for a merged descriptor.
    ///
    /// Steps appear only for fields that are present, in this order: auth,
    /// `set` headers, `Accept`, status, `Content-Type`, body, `expect`
    /// entries, custom assertion, payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor has no host or an unknown verb.
    pub fn build(descriptor: &HttpCaseDescriptor) -> DomainResult<Self> {
        let base = descriptor.require_host()?.to_string();
        let (method, payload) = descriptor.resolve_verb()?;
        let mut steps = Vec::new();

        if let Some((user, pass)) = descriptor.credentials() {
            steps.push(PlanStep::Auth {
                user: user.to_string(),
                pass: pass.to_string(),
            });
        }
        steps.extend(descriptor.set.iter().map(|entry| PlanStep::Header {
            name: entry.name.clone(),
            value: entry.value.clone(),
        }));
        if let Some(accept) = &descriptor.accept {
            steps.push(PlanStep::Header {
                name: "Accept".to_string(),
                value: accept.clone(),
            });
        }
        if let Some(status) = &descriptor.status {
            steps.push(PlanStep::Expect(Expectation::Status(status.clone())));
        }
        if let Some(matcher) = &descriptor.content_type {
            steps.push(PlanStep::Expect(header_expectation("Content-Type", matcher)));
        }
        if let Some(body) = &descriptor.body {
            steps.push(PlanStep::Expect(body_expectation(body)));
        }
        steps.extend(
            descriptor
                .expect
                .iter()
                .map(|entry| PlanStep::Expect(header_expectation(&entry.field, &entry.matcher))),
        );
        if let Some(assert) = &descriptor.assert {
            steps.push(PlanStep::Expect(Expectation::Custom(assert.clone())));
        }
        if let Some(payload) = payload {
            steps.push(PlanStep::Send(payload));
        }

        Ok(Self {
            label: descriptor.display_name(),
            base,
            method,
            path: descriptor.path.clone(),
            steps,
        })
    }

    /// Expectations in the order they are checked.
    pub fn expectations(&self) -> impl Iterator<Item = &Expectation> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Expect(expectation) => Some(expectation),
            _ => None,
        })
    }
}

fn header_expectation(name: &str, matcher: &Matcher) -> Expectation {
    Expectation::Header {
        name: name.to_string(),
        matcher: matcher.clone(),
    }
}

fn body_expectation(matcher: &BodyMatcher) -> Expectation {
    Expectation::Body(matcher.clone())
}
