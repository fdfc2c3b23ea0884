//! Named test contexts.

use std::fmt;

use crate::caller::{CallerResolver, DEFAULT_SKIP_FRAMES, ThreadNameResolver};
use crate::config::{AssertConfig, ConfigError, FailurePolicy};
use crate::host::{StdHost, TestHost};

/// A test's handle for running assertions.
///
/// The context wraps a [`TestHost`] and carries the display name used to
/// prefix failure messages. It keeps no assertion history of its own; on
/// drop it lets the host raise any failures recorded under
/// [`FailurePolicy::Continue`].
///
/// ```
/// use assert_context::TestContext;
///
/// let t = TestContext::new("parse_header");
/// t.equal(&3, &(1 + 2));
/// t.contains("content-type: text/plain", "text/plain");
/// ```
pub struct TestContext<H: TestHost = StdHost> {
    host: H,
    name: String,
    config: AssertConfig,
}

impl TestContext<StdHost> {
    /// Context on the standard harness with the default configuration.
    ///
    /// An empty `name` is replaced by the name of the calling test.
    pub fn new(name: &str) -> Self {
        Self::with_host(StdHost::new(), name)
    }

    /// Like [`TestContext::new`], but failures are recorded and raised
    /// together when the context is dropped instead of stopping the test.
    pub fn continuing(name: &str) -> Self {
        let mut ctx = Self::new(name);
        ctx.config.policy = FailurePolicy::Continue;
        ctx
    }

    /// Start building a context.
    pub fn builder() -> TestContextBuilder<StdHost, ThreadNameResolver> {
        TestContextBuilder::new()
    }
}

impl<H: TestHost> TestContext<H> {
    /// Context on an explicit host with the default configuration.
    ///
    /// An empty `name` is replaced by the name of the calling test.
    pub fn with_host(host: H, name: &str) -> Self {
        let name = resolve_name(name, &ThreadNameResolver, DEFAULT_SKIP_FRAMES);
        Self::from_parts(host, name, AssertConfig::default())
    }

    fn from_parts(host: H, name: String, config: AssertConfig) -> Self {
        tracing::trace!(name = %name, policy = %config.policy, "created test context");
        Self { host, name, config }
    }

    /// Sub-context sharing this context's host, named `"outer: inner"`.
    pub fn scoped(&self, inner: &str) -> TestContext<&H> {
        TestContext {
            host: &self.host,
            name: compose_name(&self.name, inner),
            config: self.config,
        }
    }

    /// Replace the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Name the context after a table-driven test case, e.g. `tests[3]`.
    pub fn set_index(&mut self, index: usize) {
        self.name = format!("tests[{index}]");
    }

    /// The current display name; empty if none could be found.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active configuration.
    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Report a failure, prefixed with the display name, according to the
    /// configured [`FailurePolicy`].
    #[track_caller]
    pub fn report_failure(&self, message: &str) {
        let message = self.prefixed(message);
        match self.config.policy {
            FailurePolicy::Fatal => {
                tracing::debug!(context = %self.name, "fatal assertion failure");
                self.host.fail_now(&message);
            }
            FailurePolicy::Continue => {
                tracing::warn!(
                    context = %self.name,
                    failure = %message,
                    "assertion failed, continuing"
                );
                self.host.fail(&message);
            }
        }
    }

    fn prefixed(&self, message: &str) -> String {
        if self.name.is_empty() {
            message.to_string()
        } else {
            format!("{}: {message}", self.name)
        }
    }
}

impl<H: TestHost> Drop for TestContext<H> {
    fn drop(&mut self) {
        self.host.finish();
    }
}

impl<H: TestHost> fmt::Debug for TestContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn resolve_name<R: CallerResolver + ?Sized>(name: &str, resolver: &R, skip_frames: usize) -> String {
    if !name.is_empty() {
        return name.to_string();
    }
    let resolved = resolver.resolve_caller_name(skip_frames).unwrap_or_default();
    tracing::debug!(name = %resolved, "derived test context name from caller");
    resolved
}

fn compose_name(outer: &str, inner: &str) -> String {
    match (outer.is_empty(), inner.is_empty()) {
        (true, _) => inner.to_string(),
        (false, true) => outer.to_string(),
        (false, false) => format!("{outer}: {inner}"),
    }
}

/// Builder for [`TestContext`].
pub struct TestContextBuilder<H, R> {
    host: H,
    resolver: R,
    name: String,
    config: AssertConfig,
    skip_frames: usize,
}

impl TestContextBuilder<StdHost, ThreadNameResolver> {
    fn new() -> Self {
        Self {
            host: StdHost::new(),
            resolver: ThreadNameResolver,
            name: String::new(),
            config: AssertConfig::default(),
            skip_frames: DEFAULT_SKIP_FRAMES,
        }
    }
}

impl<H: TestHost, R: CallerResolver> TestContextBuilder<H, R> {
    /// Use another host.
    pub fn host<H2: TestHost>(self, host: H2) -> TestContextBuilder<H2, R> {
        TestContextBuilder {
            host,
            resolver: self.resolver,
            name: self.name,
            config: self.config,
            skip_frames: self.skip_frames,
        }
    }

    /// Use another caller resolver.
    pub fn resolver<R2: CallerResolver>(self, resolver: R2) -> TestContextBuilder<H, R2> {
        TestContextBuilder {
            host: self.host,
            resolver,
            name: self.name,
            config: self.config,
            skip_frames: self.skip_frames,
        }
    }

    /// Explicit display name; skips caller resolution.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Frames of indirection between the test and the builder, for helpers
    /// that build contexts on a test's behalf.
    pub fn skip_frames(mut self, skip_frames: usize) -> Self {
        self.skip_frames = skip_frames;
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: AssertConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the failure policy.
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Set the preview length used by `contains` and `panics`.
    pub fn preview_len(mut self, preview_len: usize) -> Self {
        self.config.preview_len = preview_len;
        self
    }

    /// Build the context.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if the configuration does not validate.
    pub fn build(self) -> Result<TestContext<H>, ConfigError> {
        self.config.validate()?;
        let name = resolve_name(&self.name, &self.resolver, self.skip_frames);
        Ok(TestContext::from_parts(self.host, name, self.config))
    }
}
