//! In-process test harness.

mod host;
mod report;

pub use host::{DEFAULT_CASE_TIMEOUT, HarnessHost};
pub use report::{CaseReport, CaseStatus, RunReport};
