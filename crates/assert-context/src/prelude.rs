//! Convenience re-exports for common test utilities.
//!
//! ```rust
//! use assert_context::prelude::*;
//! ```

pub use crate::config::{AssertConfig, FailurePolicy};
pub use crate::context::TestContext;
pub use crate::expectation::Expectation;
pub use crate::host::{RecordingHost, TestHost};
pub use crate::{Equivalent, HasLen, Nullable, equivalent_by_eq, equivalent_fields, never_nil};

/// Result type for tests that use `?`.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
