//! In-process test host.
//!
//! `HarnessHost` records the group tree declared through the `TestHost` port
//! and runs it afterwards: sequentially, in registration order, one spawned
//! task per case so that a panic is reported as a failure.

use std::time::{Duration, Instant};

use assay_application::ApplicationResult;
use assay_application::ports::{CaseBody, Declare, TestHost};
use assay_application::use_cases::AssertionInvoker;
use assay_domain::{CaseFailure, CaseResult};
use chrono::Utc;
use tokio::task::JoinError;
use tracing::{debug, info};

use super::report::{CaseReport, CaseStatus, RunReport};

/// Default per-case timeout.
pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_millis(2000);

enum Node {
    Group { label: String, children: Vec<Self> },
    Case { description: String, body: CaseBody },
    Pending { description: String },
}

/// A leaf scheduled for execution, with its group path.
struct Scheduled {
    path: Vec<String>,
    description: String,
    body: Option<CaseBody>,
}

/// Test host that runs registered cases on the ambient tokio runtime.
pub struct HarnessHost {
    roots: Vec<Node>,
    open: Vec<(String, Vec<Node>)>,
    timeout: Duration,
    bail: bool,
}

impl Default for HarnessHost {
    fn default() -> Self {
        Self::new(DEFAULT_CASE_TIMEOUT)
    }
}

impl HarnessHost {
    /// Creates a host that fails cases running longer than `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            roots: Vec::new(),
            open: Vec::new(),
            timeout,
            bail: false,
        }
    }

    /// Stop running cases after the first failure.
    #[must_use]
    pub const fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }

    /// Number of cases registered so far, pending ones included.
    #[must_use]
    pub fn case_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Group { children, .. } => count(children),
                    Node::Case { .. } | Node::Pending { .. } => 1,
                })
                .sum()
        }
        count(&self.roots)
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Runs every registered case and returns the report.
    pub async fn run(self) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let timeout = self.timeout;
        let bail = self.bail;

        let mut scheduled = Vec::new();
        flatten(self.roots, &mut Vec::new(), &mut scheduled);

        let mut cases = Vec::with_capacity(scheduled.len());
        let mut bailing = false;
        for Scheduled {
            path,
            description,
            body,
        } in scheduled
        {
            let case_start = Instant::now();
            let status = match body {
                None => CaseStatus::Pending,
                Some(_) if bailing => CaseStatus::Skipped,
                Some(body) => match run_case(body, timeout).await {
                    Ok(()) => CaseStatus::Passed,
                    Err(failure) => CaseStatus::Failed(failure),
                },
            };
            let report = CaseReport {
                path,
                description,
                status,
                duration: case_start.elapsed(),
            };
            log_case(&report);
            bailing |= bail && report.failure().is_some();
            cases.push(report);
        }

        RunReport {
            started_at,
            cases,
            duration: start.elapsed(),
        }
    }
}

impl TestHost for HarnessHost {
    fn group(&mut self, label: &str, declare: &mut Declare<'_>) -> ApplicationResult<()> {
        debug!(group = %label, "Declaring group");
        self.open.push((label.to_string(), Vec::new()));
        let result = declare(self);
        let Some((label, children)) = self.open.pop() else {
            return result;
        };
        match result {
            Ok(()) => {
                self.push(Node::Group { label, children });
                Ok(())
            }
            Err(error) => {
                debug!(group = %label, %error, "Discarding group");
                Err(error)
            }
        }
    }

    fn case(&mut self, description: &str, body: CaseBody) {
        self.push(Node::Case {
            description: description.to_string(),
            body,
        });
    }

    fn pending(&mut self, description: &str) {
        self.push(Node::Pending {
            description: description.to_string(),
        });
    }
}

fn flatten(nodes: Vec<Node>, path: &mut Vec<String>, out: &mut Vec<Scheduled>) {
    for node in nodes {
        match node {
            Node::Group { label, children } => {
                path.push(label);
                flatten(children, path, out);
                path.pop();
            }
            Node::Case { description, body } => out.push(Scheduled {
                path: path.clone(),
                description,
                body: Some(body),
            }),
            Node::Pending { description } => out.push(Scheduled {
                path: path.clone(),
                description,
                body: None,
            }),
        }
    }
}

async fn run_case(body: CaseBody, timeout: Duration) -> CaseResult {
    let mut handle = tokio::spawn(async move { AssertionInvoker::new().complete(body).await });
    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => Err(CaseFailure::Panicked(panic_message(error))),
        Err(_) => {
            handle.abort();
            Err(CaseFailure::Timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ))
        }
    }
}

fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn log_case(report: &CaseReport) {
    let name = report.full_name();
    let duration = report.duration;
    match &report.status {
        CaseStatus::Passed => info!(case = %name, ?duration, "passed"),
        CaseStatus::Failed(failure) => info!(case = %name, ?duration, error = %failure, "failed"),
        CaseStatus::Pending => info!(case = %name, "pending"),
        CaseStatus::Skipped => info!(case = %name, "skipped"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use assay_application::ports::CaseReturn;
    use assay_application::{ApplicationError, SuiteComposer};
    use assay_domain::{Assert, Descriptor, DomainError, Done, Fixture};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::adapters::ReqwestAssertionClient;

    fn sync_body(result: CaseResult) -> CaseBody {
        CaseBody::Sync(Box::new(move || CaseReturn::Ready(result)))
    }

    fn statuses(report: &RunReport) -> Vec<(String, CaseStatus)> {
        report
            .cases
            .iter()
            .map(|case| (case.full_name(), case.status.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_runs_in_registration_order() {
        let mut host = HarnessHost::default();
        host.group("outer", &mut |host: &mut dyn TestHost| {
            host.case("first", sync_body(Ok(())));
            host.group("inner", &mut |host: &mut dyn TestHost| {
                host.pending("later");
                Ok(())
            })?;
            host.case("last", sync_body(Err(CaseFailure::assertion("nope"))));
            Ok(())
        })
        .unwrap();

        let report = host.run().await;

        assert_eq!(
            statuses(&report),
            vec![
                ("outer > first".to_string(), CaseStatus::Passed),
                ("outer > inner > later".to_string(), CaseStatus::Pending),
                (
                    "outer > last".to_string(),
                    CaseStatus::Failed(CaseFailure::assertion("nope"))
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_declaration_discards_group() {
        let mut host = HarnessHost::default();
        let result = host.group("broken", &mut |host: &mut dyn TestHost| {
            host.case("registered before error", sync_body(Ok(())));
            Err(ApplicationError::registration(
                "broken",
                "hostless",
                DomainError::MissingHost("hostless".to_string()),
            ))
        });

        assert!(result.is_err());
        assert_eq!(host.case_count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_sync_case_fails() {
        let mut host = HarnessHost::default();
        host.case(
            "explodes",
            CaseBody::Sync(Box::new(|| -> CaseReturn { panic!("kaboom") })),
        );

        let report = host.run().await;

        assert_eq!(
            report.cases[0].status,
            CaseStatus::Failed(CaseFailure::Panicked("kaboom".to_string()))
        );
    }

    #[tokio::test]
    async fn test_async_case_that_never_completes_times_out() {
        let mut host = HarnessHost::new(Duration::from_millis(50));
        host.case(
            "hangs",
            CaseBody::Async(Box::new(|done| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    done.pass();
                })
            })),
        );

        let report = host.run().await;

        assert_eq!(
            report.cases[0].status,
            CaseStatus::Failed(CaseFailure::Timeout(50))
        );
    }

    #[tokio::test]
    async fn test_dropped_done_fails() {
        let mut host = HarnessHost::default();
        host.case(
            "forgets",
            CaseBody::Async(Box::new(|done| {
                drop(done);
                Box::pin(async {})
            })),
        );

        let report = host.run().await;

        assert_eq!(
            report.cases[0].status,
            CaseStatus::Failed(CaseFailure::Abandoned)
        );
    }

    #[tokio::test]
    async fn test_bail_skips_remaining_cases() {
        let mut host = HarnessHost::default().with_bail(true);
        host.case("fails", sync_body(Err(CaseFailure::assertion("first"))));
        host.case("skipped", sync_body(Ok(())));
        host.pending("still pending");

        let report = host.run().await;

        assert_eq!(report.cases[1].status, CaseStatus::Skipped);
        assert_eq!(report.cases[2].status, CaseStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_suite_never_runs_assertions() {
        let composer = SuiteComposer::new(ReqwestAssertionClient::new(1_000).unwrap());
        let mut host = HarnessHost::default();
        let descriptors = vec![
            Descriptor::case("would panic", Assert::sync(|_| panic!("must not run"))),
            Descriptor::case("would wait", Assert::async_plain(|_done: Done| {})),
        ];

        composer
            .compose(
                &mut host,
                "parked",
                &descriptors,
                &Fixture::from_value(json!({"pending": true})).unwrap(),
            )
            .unwrap();
        let report = host.run().await;

        assert_eq!(report.pending(), 2);
        assert!(report.is_success());
    }
}
