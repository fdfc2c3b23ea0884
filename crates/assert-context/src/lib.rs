//! Named test contexts with diffing assertions.
//!
//! A [`TestContext`] wraps the test's failure channel (a [`TestHost`]) and a
//! display name, and offers assertions that report descriptive, name-prefixed
//! failures and return whether they passed.
//!
//! # Modules
//!
//! - [`context`] - [`TestContext`] and its builder
//! - [`assertions`] - `equal`, `not_equal`, `is_nil`, `is_not_nil`, `length`,
//!   `contains`, `panics`, `check_error`
//! - [`expectation`] - [`Expectation`], the expected outcome of a fallible call
//! - [`host`] - failure reporting on the standard harness or into a recorder
//! - [`caller`] - caller name resolution for unnamed contexts
//! - [`compare`] - deep equality that treats empty and absent values alike
//! - [`nil`] - nil detection through wrappers
//! - [`length`] - element counts for `length`
//! - [`mod@panic`] - panic capture for `panics`
//! - [`render`] - value dumps, diffs and string previews
//! - [`config`] - assertion tunables and failure policy
//! - [`prelude`] - convenience re-exports
//!
//! # Usage
//!
//! ```rust
//! use assert_context::prelude::*;
//!
//! fn parse_port(s: &str) -> Result<u16, std::num::ParseIntError> {
//!     s.parse()
//! }
//!
//! let mut t = TestContext::new("parse_port");
//! let cases = [("80", ""), ("http", "invalid digit"), ("70000", "too large")];
//! for (i, (input, err)) in cases.iter().enumerate() {
//!     t.set_index(i);
//!     t.check_result(&parse_port(input), *err);
//! }
//! ```
//!
//! # Failure policy
//!
//! By default a failed assertion stops the test at once (it panics at the
//! assertion's call site). [`FailurePolicy::Continue`] records failures and
//! raises them all when the context is dropped.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod caller;
pub mod compare;
pub mod config;
pub mod context;
pub mod expectation;
pub mod host;
pub mod length;
pub mod nil;
pub mod panic;
pub mod prelude;
pub mod render;

pub use caller::{BacktraceResolver, CallerResolver, FixedResolver, ThreadNameResolver};
pub use compare::Equivalent;
pub use config::{AssertConfig, ConfigError, FailurePolicy};
pub use context::{TestContext, TestContextBuilder};
pub use expectation::Expectation;
pub use host::{RecordedFailure, RecordingHost, StdHost, TestHost};
pub use length::HasLen;
pub use nil::Nullable;
pub use panic::{PanicSignal, capture_panic};
