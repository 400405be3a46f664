//! Assay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the pieces a runner needs around
//! them: suite file loading and layered settings.

pub mod adapters;
pub mod harness;
pub mod loader;
pub mod settings;
pub mod testing;

pub use adapters::{ReqwestAssertionClient, ReqwestPendingRequest};
pub use harness::{CaseReport, CaseStatus, DEFAULT_CASE_TIMEOUT, HarnessHost, RunReport};
pub use loader::{LoadError, SuiteFile};
pub use settings::{RunnerSettings, SettingsError};
pub use testing::ExpectationChecker;
