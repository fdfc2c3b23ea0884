//! Caller name resolution.
//!
//! Contexts created without an explicit name label themselves after the test
//! function that created them. How that name is found is platform specific
//! and best effort, so it sits behind [`CallerResolver`]; a resolver that
//! cannot find a name returns `None` and the context ends up unnamed.

use std::backtrace::Backtrace;

/// Frames between the resolver call and the test function when a context is
/// built through [`crate::TestContext::new`].
pub const DEFAULT_SKIP_FRAMES: usize = 0;

/// Finds the name of the function that created a context.
pub trait CallerResolver {
    /// Resolve the caller's unqualified function name, skipping
    /// `skip_frames` frames of indirection past this crate's own frames.
    fn resolve_caller_name(&self, skip_frames: usize) -> Option<String>;
}

impl<R: CallerResolver + ?Sized> CallerResolver for &R {
    fn resolve_caller_name(&self, skip_frames: usize) -> Option<String> {
        (**self).resolve_caller_name(skip_frames)
    }
}

impl<R: CallerResolver + ?Sized> CallerResolver for Box<R> {
    fn resolve_caller_name(&self, skip_frames: usize) -> Option<String> {
        (**self).resolve_caller_name(skip_frames)
    }
}

/// Resolves the caller from the current thread's name.
///
/// The standard harness runs every test on a thread named after the test's
/// path (`module::tests::test_name`), which makes this the cheap and
/// reliable choice. `skip_frames` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNameResolver;

impl CallerResolver for ThreadNameResolver {
    fn resolve_caller_name(&self, _skip_frames: usize) -> Option<String> {
        let thread = std::thread::current();
        let name = thread.name()?;
        if name == "main" {
            return None;
        }
        non_empty(trailing_identifier(name))
    }
}

/// Resolves the caller by walking a captured backtrace.
///
/// Needs debug info; with symbols stripped or the caller inlined away the
/// walk finds nothing and resolution returns `None`.
#[derive(Debug, Clone, Default)]
pub struct BacktraceResolver {
    ignored_prefixes: Vec<String>,
}

/// Symbol prefixes that never name a test function.
const RUNTIME_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "test::",
    "backtrace::",
    "__rust",
    "_start",
    "__libc",
    "<",
];

/// Source locations of the standard library and test harness.
const RUNTIME_FILES: &[&str] = &[
    "/rustc/",
    "/library/std/",
    "/library/core/",
    "/library/alloc/",
    "/library/test/",
];

/// Functions of this crate that sit between a test and the resolver.
///
/// Inlined frames print without their module path, so these are matched by
/// bare name as well.
const OWN_FUNCTIONS: &[&str] = &[
    "resolve_caller_name",
    "resolve_from_rendered",
    "resolve_name",
    "from_parts",
    "with_host",
    "continuing",
    "build",
];

impl BacktraceResolver {
    /// Resolver ignoring runtime frames and this crate's frames.
    pub fn new() -> Self {
        Self {
            ignored_prefixes: vec![format!("{}::", env!("CARGO_CRATE_NAME"))],
        }
    }

    /// Also ignore frames whose symbol starts with `prefix`, such as a
    /// project-local wrapper around context creation.
    pub fn ignoring(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_prefixes.push(prefix.into());
        self
    }

    /// Pick the caller out of a rendered backtrace.
    pub fn resolve_from_rendered(&self, rendered: &str, skip_frames: usize) -> Option<String> {
        frames(rendered)
            .into_iter()
            .filter(|frame| !self.is_ignored(frame))
            .nth(skip_frames)
            .and_then(|frame| non_empty(trailing_identifier(frame.symbol)))
    }

    fn is_ignored(&self, frame: &Frame<'_>) -> bool {
        let symbol = frame.symbol;
        if RUNTIME_PREFIXES.iter().any(|p| symbol.starts_with(p))
            || self
                .ignored_prefixes
                .iter()
                .any(|p| symbol.starts_with(p.as_str()))
        {
            return true;
        }
        let bare = strip_generics(symbol);
        if !bare.contains("::") && OWN_FUNCTIONS.contains(&bare.trim()) {
            return true;
        }
        frame.file.is_some_and(|file| {
            let file = file.replace('\\', "/");
            RUNTIME_FILES.iter().any(|dir| file.contains(dir)) || is_own_source(&file)
        })
    }
}

/// Whether `file` lies in this crate's `src/` directory.
fn is_own_source(file: &str) -> bool {
    let manifest_src = concat!(env!("CARGO_MANIFEST_DIR"), "/src/").replace('\\', "/");
    if file.contains(&manifest_src) {
        return true;
    }
    // `file!()` is relative to the workspace root when built in a workspace.
    let here = file!().replace('\\', "/");
    let Some(own_dir) = here.rsplit_once('/').map(|(dir, _)| format!("{dir}/")) else {
        return false;
    };
    // A bare `src/` would match every crate.
    own_dir != "src/" && file.trim_start_matches("./").contains(&own_dir)
}

impl CallerResolver for BacktraceResolver {
    fn resolve_caller_name(&self, skip_frames: usize) -> Option<String> {
        let rendered = Backtrace::force_capture().to_string();
        let name = self.resolve_from_rendered(&rendered, skip_frames);
        tracing::trace!(?name, skip_frames, "resolved caller from backtrace");
        name
    }
}

/// Resolver returning a fixed answer, for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver(pub Option<String>);

impl FixedResolver {
    /// Always resolve to `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// Never resolve.
    pub fn unresolved() -> Self {
        Self(None)
    }
}

impl CallerResolver for FixedResolver {
    fn resolve_caller_name(&self, _skip_frames: usize) -> Option<String> {
        self.0.clone()
    }
}

/// Strip module and type qualifiers, keeping the last path segment.
///
/// Closure segments and symbol hashes are dropped, so
/// `my_crate::tests::it_works::{{closure}}::h0123456789abcdef` becomes
/// `it_works`.
pub fn trailing_identifier(qualified: &str) -> String {
    strip_generics(qualified)
        .trim()
        .rsplit("::")
        .find(|segment| !segment.is_empty() && !is_closure(segment) && !is_symbol_hash(segment))
        .unwrap_or_default()
        .to_string()
}

fn is_closure(segment: &str) -> bool {
    segment.starts_with("{{") && segment.ends_with("}}")
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

fn non_empty(name: String) -> Option<String> {
    if name.is_empty() { None } else { Some(name) }
}

/// Drop generic arguments, so `resolve_name<my::Type>` becomes
/// `resolve_name`. `->` inside the arguments is not a closing bracket.
fn strip_generics(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    let mut depth = 0usize;
    let mut prev = '\0';
    for c in symbol.chars() {
        match c {
            '<' => depth += 1,
            '>' if prev == '-' => {}
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
        prev = c;
    }
    out
}

/// One frame of a rendered backtrace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame<'a> {
    symbol: &'a str,
    file: Option<&'a str>,
}

/// Frames of a rendered backtrace, innermost first.
///
/// Frame lines look like `  12: path::to::function`, optionally followed by
/// an `at file:line:col` line.
fn frames(rendered: &str) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.file.get_or_insert(location.trim());
            }
            continue;
        }
        let Some((index, symbol)) = trimmed.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        frames.push(Frame {
            symbol: symbol.trim(),
            file: None,
        });
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::create
             at /rustc/library/std/src/backtrace.rs:331:13
   2: assert_context::caller::BacktraceResolver::resolve_caller_name
             at ./src/caller.rs:100:24
   3: assert_context::context::TestContext::new
             at ./src/context.rs:40:9
   4: suite::helpers::fresh_context
             at ./tests/suite.rs:10:5
   5: suite::login_rejects_bad_password
             at ./tests/suite.rs:20:13
   6: suite::login_rejects_bad_password::{{closure}}
             at ./tests/suite.rs:19:36
   7: core::ops::function::FnOnce::call_once
             at /rustc/library/core/src/ops/function.rs:250:5
";

    #[test]
    fn test_trailing_identifier_strips_qualifiers() {
        assert_eq!(trailing_identifier("crate::tests::it_works"), "it_works");
        assert_eq!(trailing_identifier("it_works"), "it_works");
        assert_eq!(trailing_identifier("a::b::{{closure}}"), "b");
        assert_eq!(trailing_identifier("a::b::h0123456789abcdef"), "b");
        assert_eq!(trailing_identifier(""), "");
    }

    #[test]
    fn test_backtrace_resolver_skips_runtime_and_crate_frames() {
        let resolver = BacktraceResolver::new();
        assert_eq!(
            resolver.resolve_from_rendered(RENDERED, 0).as_deref(),
            Some("fresh_context")
        );
        assert_eq!(
            resolver.resolve_from_rendered(RENDERED, 1).as_deref(),
            Some("login_rejects_bad_password")
        );
    }

    #[test]
    fn test_backtrace_resolver_ignoring_helper_module() {
        let resolver = BacktraceResolver::new().ignoring("suite::helpers::");
        assert_eq!(
            resolver.resolve_from_rendered(RENDERED, 0).as_deref(),
            Some("login_rejects_bad_password")
        );
    }

    /// Frames as printed with line tables only: inlined frames lose their
    /// module path.
    fn inlined_rendered() -> String {
        let caller = file!();
        let context = caller.replace("caller.rs", "context.rs");
        format!(
            "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/0123abcd/library/std/src/../../backtrace/src/backtrace/libunwind.rs:117:9
   1: std::backtrace::Backtrace::force_capture
             at /rustc/0123abcd/library/std/src/backtrace.rs:312:9
   2: <assert_context::caller::BacktraceResolver as assert_context::caller::CallerResolver>::resolve_caller_name
             at ./{caller}:108:24
   3: resolve_name<assert_context::caller::BacktraceResolver>
             at ./{context}:150:20
   4: assert_context::context::TestContextBuilder<H,R>::build
             at ./{context}:260:20
   5: from_parts<suite::Host>
   6: login_rejects_bad_password
             at ./tests/suite.rs:20:13
   7: suite::login_rejects_bad_password::{{{{closure}}}}
             at ./tests/suite.rs:19:36
"
        )
    }

    #[test]
    fn test_backtrace_resolver_skips_inlined_crate_frames() {
        let resolver = BacktraceResolver::new();
        assert_eq!(
            resolver.resolve_from_rendered(&inlined_rendered(), 0).as_deref(),
            Some("login_rejects_bad_password")
        );
    }

    #[test]
    fn test_frames_pair_symbols_with_locations() {
        let parsed = frames(RENDERED);
        assert_eq!(parsed.len(), 8);
        assert_eq!(
            parsed[4],
            Frame {
                symbol: "suite::helpers::fresh_context",
                file: Some("./tests/suite.rs:10:5"),
            }
        );
    }

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("resolve_name<a::B>"), "resolve_name");
        assert_eq!(strip_generics("a::Builder<H,R>::build"), "a::Builder::build");
        assert_eq!(strip_generics("run<F: Fn() -> u8>"), "run");
        assert_eq!(trailing_identifier("resolve_name<probe::Dump>"), "resolve_name");
    }

    #[test]
    fn test_backtrace_resolver_empty_backtrace() {
        let resolver = BacktraceResolver::new();
        assert_eq!(resolver.resolve_from_rendered("", 0), None);
        assert_eq!(resolver.resolve_from_rendered(RENDERED, 10), None);
    }

    #[test]
    fn test_thread_name_resolver_names_test() {
        // The harness names this thread `caller::tests::test_thread_name_resolver_names_test`.
        let name = ThreadNameResolver.resolve_caller_name(DEFAULT_SKIP_FRAMES);
        if let Some(name) = name {
            assert_eq!(name, "test_thread_name_resolver_names_test");
        }
    }

    #[test]
    fn test_thread_name_resolver_unnamed_thread() {
        let name = std::thread::spawn(|| ThreadNameResolver.resolve_caller_name(0))
            .join()
            .unwrap();
        assert_eq!(name, None);
    }

    #[test]
    fn test_fixed_resolver() {
        assert_eq!(
            FixedResolver::named("suite").resolve_caller_name(3).as_deref(),
            Some("suite")
        );
        assert_eq!(FixedResolver::unresolved().resolve_caller_name(0), None);
    }
}
