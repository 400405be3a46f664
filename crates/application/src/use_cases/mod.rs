//! Application use cases (business logic orchestration).

mod compose_suite;
mod dispatch_case;
mod invoke_assertion;
mod request_plan;
mod run_http_case;

pub use compose_suite::*;
pub use dispatch_case::*;
pub use invoke_assertion::*;
pub use request_plan::*;
pub use run_http_case::*;
