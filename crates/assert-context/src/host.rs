//! Host test runner boundary.
//!
//! A [`TestHost`] receives assertion failures. [`StdHost`] maps them onto the
//! standard test harness, where failing means panicking; [`RecordingHost`]
//! keeps every message so the assertions themselves can be tested.

use std::cell::RefCell;

/// Receiver for assertion failures.
pub trait TestHost {
    /// Report a failure and stop the test.
    ///
    /// Hosts that cannot stop the test (such as [`RecordingHost`]) record
    /// the failure and return; the calling assertion then returns `false`.
    fn fail_now(&self, message: &str);

    /// Report a failure and let the test continue.
    fn fail(&self, message: &str);

    /// Called once when the owning context goes away.
    fn finish(&self) {}

    /// Failures reported so far.
    fn failures(&self) -> Vec<String>;
}

impl<H: TestHost + ?Sized> TestHost for &H {
    #[track_caller]
    fn fail_now(&self, message: &str) {
        (**self).fail_now(message);
    }

    #[track_caller]
    fn fail(&self, message: &str) {
        (**self).fail(message);
    }

    // A borrowed host belongs to an outer context, which finishes it.
    fn finish(&self) {}

    fn failures(&self) -> Vec<String> {
        (**self).failures()
    }
}

/// Host backed by the standard test harness.
///
/// Fatal failures panic at the assertion's call site. Non-fatal failures are
/// collected and raised together by [`TestHost::finish`].
#[derive(Debug, Default)]
pub struct StdHost {
    failures: RefCell<Vec<String>>,
}

impl StdHost {
    /// Create a host with no recorded failures.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TestHost for StdHost {
    #[track_caller]
    fn fail_now(&self, message: &str) {
        let earlier = self.failures.take();
        if earlier.is_empty() {
            panic!("{message}");
        }
        panic!("{}\n{message}", earlier.join("\n"));
    }

    fn fail(&self, message: &str) {
        self.failures.borrow_mut().push(message.to_string());
    }

    /// Raise the recorded failures in one panic.
    ///
    /// While the thread is already unwinding a second panic would abort, so
    /// the failures are logged and written to stderr instead, where the
    /// harness shows them with the failed test's output.
    #[track_caller]
    fn finish(&self) {
        let failures = self.failures.take();
        if failures.is_empty() {
            return;
        }
        let report = failure_report(&failures);
        if std::thread::panicking() {
            tracing::error!(
                count = failures.len(),
                failures = %failures.join("\n"),
                "test panicked with unreported assertion failures"
            );
            eprintln!("{report}");
            return;
        }
        panic!("{report}");
    }

    fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }
}

fn failure_report(failures: &[String]) -> String {
    format!(
        "{} assertion(s) failed:\n{}",
        failures.len(),
        failures.join("\n")
    )
}

/// A failure captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    /// Full failure message, including the context name prefix.
    pub message: String,
    /// Whether the failure was reported as fatal.
    pub fatal: bool,
}

/// Host that records failures instead of failing the test.
#[derive(Debug, Default)]
pub struct RecordingHost {
    records: RefCell<Vec<RecordedFailure>>,
}

impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded failure with its severity.
    pub fn records(&self) -> Vec<RecordedFailure> {
        self.records.borrow().clone()
    }

    /// The most recent failure message.
    pub fn last_message(&self) -> Option<String> {
        self.records.borrow().last().map(|r| r.message.clone())
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Forget every recorded failure.
    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    fn record(&self, message: &str, fatal: bool) {
        self.records.borrow_mut().push(RecordedFailure {
            message: message.to_string(),
            fatal,
        });
    }
}

impl TestHost for RecordingHost {
    fn fail_now(&self, message: &str) {
        self.record(message, true);
    }

    fn fail(&self, message: &str) {
        self.record(message, false);
    }

    fn failures(&self) -> Vec<String> {
        self.records.borrow().iter().map(|r| r.message.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn test_recording_host_keeps_order_and_severity() {
        let host = RecordingHost::new();
        host.fail("first");
        host.fail_now("second");
        assert_eq!(host.len(), 2);
        assert_eq!(
            host.records(),
            vec![
                RecordedFailure {
                    message: "first".to_string(),
                    fatal: false
                },
                RecordedFailure {
                    message: "second".to_string(),
                    fatal: true
                },
            ]
        );
        assert_eq!(host.last_message().as_deref(), Some("second"));
        host.clear();
        assert!(host.is_empty());
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_std_host_fail_now_panics() {
        StdHost::new().fail_now("boom");
    }

    #[test]
    fn test_std_host_fail_records_without_panicking() {
        let host = StdHost::new();
        host.fail("one");
        host.fail("two");
        assert_eq!(host.failures(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_std_host_finish_raises_recorded_failures() {
        let result = panic::catch_unwind(|| {
            let host = StdHost::new();
            host.fail("one");
            host.fail("two");
            host.finish();
        });
        let payload = result.unwrap_err();
        let msg = payload.downcast_ref::<String>().unwrap();
        assert!(msg.starts_with("2 assertion(s) failed:"));
        assert!(msg.contains("one\ntwo"));
    }

    #[test]
    fn test_std_host_finish_while_unwinding_does_not_panic_again() {
        let result = panic::catch_unwind(|| {
            struct FinishOnDrop(StdHost);
            impl Drop for FinishOnDrop {
                fn drop(&mut self) {
                    self.0.finish();
                }
            }
            let guard = FinishOnDrop(StdHost::new());
            guard.0.fail("recorded");
            panic!("unrelated");
        });
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"unrelated"));
    }

    #[test]
    fn test_failure_report_format() {
        let report = failure_report(&["a: one".to_string(), "a: two".to_string()]);
        assert_eq!(report, "2 assertion(s) failed:\na: one\na: two");
    }

    #[test]
    fn test_std_host_finish_without_failures_is_quiet() {
        let host = StdHost::new();
        host.finish();
        assert!(host.failures().is_empty());
    }

    #[test]
    fn test_borrowed_host_forwards() {
        let host = RecordingHost::new();
        let borrowed = &host;
        borrowed.fail("via ref");
        borrowed.finish();
        assert_eq!(host.failures(), vec!["via ref".to_string()]);
    }
}
