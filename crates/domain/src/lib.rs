//! Assay Domain - Core test-suite types
//!
//! This crate defines the data model of declarative test suites: descriptors,
//! fixtures, tagged assertions, HTTP expectations and case outcomes.
//! All types here are pure Rust with no I/O dependencies.

pub mod assert;
pub mod descriptor;
pub mod error;
pub mod expectation;
pub mod fixture;
pub mod matcher;
pub mod outcome;
pub mod request;
pub mod response;

pub use assert::{Assert, BoxFuture, CaseKind, Done};
pub use descriptor::{CaseDescriptor, Descriptor, HttpCaseDescriptor, LintWarning, SuiteDescriptor};
pub use error::{DomainError, DomainResult};
pub use expectation::{Expectation, FieldExpectation, ResponseAssert, StatusExpectation};
pub use fixture::Fixture;
pub use matcher::{BodyMatcher, Matcher};
pub use outcome::{CaseFailure, CaseResult};
pub use request::{HeaderEntry, HttpMethod};
pub use response::{ResponseSpec, StatusCode};
