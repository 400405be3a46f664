//! HTTP request building blocks used by HTTP cases

mod header;
mod method;

pub use header::HeaderEntry;
pub use method::HttpMethod;
