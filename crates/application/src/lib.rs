//! Assay Application - Use cases and ports
//!
//! This crate composes descriptor trees into host registrations and turns
//! HTTP case descriptors into request-assertion pipelines. It depends only
//! on the domain crate; the HTTP client and the runner are reached through
//! the ports in [`ports`].

pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::*;
pub use use_cases::*;
