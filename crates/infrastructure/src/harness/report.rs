//! Run reports.

use std::fmt;
use std::time::Duration;

use assay_domain::CaseFailure;
use chrono::{DateTime, Utc};

/// Final state of one registered case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    /// The case completed successfully.
    Passed,
    /// The case completed with a failure.
    Failed(CaseFailure),
    /// The case was registered as pending and never run.
    Pending,
    /// The case was not run because an earlier case failed with bail enabled.
    Skipped,
}

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Labels of the enclosing groups, outermost first.
    pub path: Vec<String>,
    /// Case description.
    pub description: String,
    /// Final state.
    pub status: CaseStatus,
    /// Time spent running the case.
    pub duration: Duration,
}

impl CaseReport {
    /// Group labels and description joined with ` > `.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.description.as_str()))
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Returns the failure, if the case failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&CaseFailure> {
        match &self.status {
            CaseStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Results of a whole run, in registration order.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-case results.
    pub cases: Vec<CaseReport>,
    /// Total run time.
    pub duration: Duration,
}

impl RunReport {
    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|status| matches!(status, CaseStatus::Passed))
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, CaseStatus::Failed(_)))
    }

    /// Number of pending cases.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.count(|status| matches!(status, CaseStatus::Pending))
    }

    /// Number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, CaseStatus::Skipped))
    }

    /// Check if no case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed cases, in registration order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| case.failure().is_some())
    }

    fn count(&self, predicate: impl Fn(&CaseStatus) -> bool) -> usize {
        self.cases.iter().filter(|case| predicate(&case.status)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            let mark = match case.status {
                CaseStatus::Passed => "ok",
                CaseStatus::Failed(_) => "FAIL",
                CaseStatus::Pending => "pending",
                CaseStatus::Skipped => "skipped",
            };
            writeln!(f, "  [{mark}] {}", case.full_name())?;
        }

        writeln!(f)?;
        write!(
            f,
            "{} passing, {} failing, {} pending",
            self.passed(),
            self.failed(),
            self.pending()
        )?;
        if self.skipped() > 0 {
            write!(f, ", {} skipped", self.skipped())?;
        }
        writeln!(f, " ({}ms)", self.duration.as_millis())?;

        for (index, case) in self.failures().enumerate() {
            if let Some(failure) = case.failure() {
                writeln!(f)?;
                writeln!(f, "  {}) {}", index + 1, case.full_name())?;
                writeln!(f, "     {failure}")?;
            }
        }
        Ok(())
    }
}
