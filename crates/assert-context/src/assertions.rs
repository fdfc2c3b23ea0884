//! Assertions on a [`TestContext`].
//!
//! Every assertion reports through [`TestContext::report_failure`] and
//! returns whether it passed. Under the default fatal policy a failure never
//! returns on the standard host; the `bool` is for continuing contexts and
//! recording hosts.

use std::error::Error;
use std::fmt::Debug;

use crate::compare::Equivalent;
use crate::context::TestContext;
use crate::expectation::Expectation;
use crate::host::TestHost;
use crate::length::HasLen;
use crate::nil::Nullable;
use crate::panic::{capture_panic, function_name};
use crate::render::{difference, dump, preview};

impl<H: TestHost> TestContext<H> {
    /// Check that `actual` equals `expected`, treating empty and absent
    /// values as equal.
    ///
    /// Small values are dumped in full; past the configured diff threshold
    /// the failure carries a unified diff (`-` got, `+` want).
    #[track_caller]
    pub fn equal<T: Equivalent + Debug + ?Sized>(&self, expected: &T, actual: &T) -> bool {
        if actual.equivalent(expected) {
            return true;
        }
        let diff = difference(expected, actual, self.config().diff_threshold);
        self.report_failure(&format!("differs: (-got +want)\n{diff}"));
        false
    }

    /// Check that `actual` differs from `expected` under the same rules as
    /// [`TestContext::equal`].
    #[track_caller]
    pub fn not_equal<T: Equivalent + Debug + ?Sized>(&self, expected: &T, actual: &T) -> bool {
        if !actual.equivalent(expected) {
            return true;
        }
        self.report_failure(&format!("actual equals expected:\n{}", dump(expected)));
        false
    }

    /// Check that `value` is nil, including a nil payload inside a non-nil
    /// wrapper such as `Some(None)`.
    #[track_caller]
    pub fn is_nil<T: Nullable + Debug + ?Sized>(&self, value: &T) -> bool {
        if value.is_nil() {
            return true;
        }
        self.report_failure(&format!("should be nil, not {}", dump(value)));
        false
    }

    /// Check that `value` is not nil.
    #[track_caller]
    pub fn is_not_nil<T: Nullable + ?Sized>(&self, value: &T) -> bool {
        if !value.is_nil() {
            return true;
        }
        self.report_failure("should not be nil");
        false
    }

    /// Check that `container` holds exactly `expected` elements.
    #[track_caller]
    pub fn length<C: HasLen + ?Sized>(&self, container: &C, expected: usize) -> bool {
        self.equal(&expected, &HasLen::len(container))
    }

    /// Check that `needle` occurs in `haystack`.
    #[track_caller]
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        if haystack.contains(needle) {
            return true;
        }
        let max = self.config().preview_len;
        self.report_failure(&format!(
            "{:?} does not contain {:?}",
            preview(haystack, max),
            preview(needle, max)
        ));
        false
    }

    /// Check that `f` panics with a message containing `msg_contains`. An
    /// empty `msg_contains` accepts any panic.
    #[track_caller]
    pub fn panics<F: FnOnce()>(&self, f: F, msg_contains: &str) -> bool {
        let name = function_name(&f);
        let Err(signal) = capture_panic(f) else {
            self.report_failure(&format!("expected function `{name}` to panic"));
            return false;
        };
        let message = signal.message_or_empty();
        if message.contains(msg_contains) {
            return true;
        }
        let max = self.config().preview_len;
        self.report_failure(&format!(
            "panic message {:?} does not contain {:?}",
            preview(message, max),
            preview(msg_contains, max)
        ));
        false
    }

    /// Check an error outcome against `expected`.
    ///
    /// `expected` is anything convertible to an [`Expectation`]: `()` for no
    /// error, a `bool` for error presence, a string for an error containing
    /// it, or an explicit [`Expectation::Exact`].
    ///
    /// Returns whether no error occurred, whether or not the check passed,
    /// so callers can go on using a successful result.
    ///
    /// Other types do not convert to an expectation and are rejected at
    /// compile time:
    ///
    /// ```compile_fail
    /// use assert_context::TestContext;
    ///
    /// let t = TestContext::new("t");
    /// t.check_error(None, 42_i32);
    /// ```
    #[track_caller]
    pub fn check_error(
        &self,
        actual: Option<&(dyn Error + 'static)>,
        expected: impl Into<Expectation>,
    ) -> bool {
        let expected = expected.into();
        if let Err(message) = expected.evaluate(actual) {
            tracing::debug!(?expected, "error check failed");
            self.report_failure(&message);
        }
        actual.is_none()
    }

    /// [`TestContext::check_error`] on the error side of a `Result`.
    #[track_caller]
    pub fn check_result<T, E: Error + 'static>(
        &self,
        actual: &Result<T, E>,
        expected: impl Into<Expectation>,
    ) -> bool {
        let err = actual.as_ref().err().map(|e| e as &(dyn Error + 'static));
        self.check_error(err, expected)
    }
}
