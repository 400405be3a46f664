//! In-memory port implementations shared by the unit tests.

use std::sync::{Arc, Mutex};

use assay_domain::{CaseResult, Expectation, HttpMethod};
use serde_json::Value;

use crate::ApplicationResult;
use crate::ports::{
    CaseBody, Declare, HttpClientError, PendingRequest, RequestAssertionClient, TestHost,
};

/// Client that records every call and ends with a canned result.
#[derive(Clone)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<String>>>,
    outcome: CaseResult,
}

impl RecordingClient {
    pub fn new(outcome: CaseResult) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    pub fn passing() -> Self {
        Self::new(Ok(()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

pub struct RecordingRequest {
    calls: Arc<Mutex<Vec<String>>>,
    outcome: CaseResult,
}

impl RecordingRequest {
    fn record(self, call: String) -> Self {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        self
    }
}

impl RequestAssertionClient for RecordingClient {
    type Request = RecordingRequest;

    fn open(
        &self,
        base: &str,
        method: HttpMethod,
        path: &str,
    ) -> Result<Self::Request, HttpClientError> {
        if !base.starts_with("http") {
            return Err(HttpClientError::InvalidUrl(format!("{base}{path}")));
        }
        let request = RecordingRequest {
            calls: Arc::clone(&self.calls),
            outcome: self.outcome.clone(),
        };
        Ok(request.record(format!("open {base} {method} {path}")))
    }
}

impl PendingRequest for RecordingRequest {
    fn auth(self, user: &str, pass: &str) -> Self {
        self.record(format!("auth {user}:{pass}"))
    }

    fn header(self, name: &str, value: &str) -> Self {
        self.record(format!("header {name}: {value}"))
    }

    fn expect(self, expectation: Expectation) -> Self {
        self.record(format!("expect {}", expectation.description()))
    }

    fn send(self, payload: Value) -> Self {
        self.record(format!("send {payload}"))
    }

    async fn end(self) -> CaseResult {
        let outcome = self.outcome.clone();
        let _ = self.record("end".to_string());
        outcome
    }
}

/// Host that records registration events and keeps case bodies.
#[derive(Default)]
pub struct RecordingHost {
    pub events: Vec<String>,
    pub bodies: Vec<(String, CaseBody)>,
}

impl RecordingHost {
    pub fn take_body(&mut self, description: &str) -> Option<CaseBody> {
        let index = self.bodies.iter().position(|(d, _)| d == description)?;
        Some(self.bodies.remove(index).1)
    }
}

impl TestHost for RecordingHost {
    fn group(&mut self, label: &str, declare: &mut Declare<'_>) -> ApplicationResult<()> {
        self.events.push(format!("group {label}"));
        let result = declare(self);
        self.events.push(format!("end {label}"));
        result
    }

    fn case(&mut self, description: &str, body: CaseBody) {
        let kind = if body.is_async() { "async" } else { "sync" };
        self.events.push(format!("case {description} ({kind})"));
        self.bodies.push((description.to_string(), body));
    }

    fn pending(&mut self, description: &str) {
        self.events.push(format!("pending {description}"));
    }
}
