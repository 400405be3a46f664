//! Port definitions (interfaces)
//!
//! Ports define the boundaries between suite composition and the outside
//! world: the runner cases are registered with and the HTTP client requests
//! are sent through.

mod request_client;
mod test_host;

pub use request_client::{HttpClientError, PendingRequest, RequestAssertionClient};
pub use test_host::{CaseBody, CaseReturn, Declare, TestHost};
