//! Response checking.
//!
//! This module checks attached expectations against a received response.

mod checker;

pub use checker::ExpectationChecker;
