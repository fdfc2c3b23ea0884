//! Rendering of values for failure messages.

use std::fmt::Debug;

use similar::TextDiff;

/// Pretty `Debug` dump of a value.
pub fn dump<T: Debug + ?Sized>(value: &T) -> String {
    format!("{value:#?}")
}

/// Shorten `s` to its first and last `max_len / 2` characters around `...`
/// when it is longer than `max_len` characters.
pub fn preview(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    let half = max_len / 2;
    let head: String = s.chars().take(half).collect();
    let tail: String = s.chars().skip(len.saturating_sub(half)).collect();
    format!("{head}...{tail}")
}

/// Body of an `equal` failure.
///
/// Both values are dumped in full unless the combined text is longer than
/// `diff_threshold` characters, in which case only a unified diff of the
/// dumps is returned: `-` lines come from `actual`, `+` lines from
/// `expected`. Dumps that render identically are always shown in full.
pub fn difference<T: Debug + ?Sized>(expected: &T, actual: &T, diff_threshold: usize) -> String {
    let want = dump(expected);
    let got = dump(actual);
    let full = format!("expected {want}\ngot {got}\n");
    // Values that differ but print alike (NaN, say) have an empty diff.
    if got == want || full.chars().count() <= diff_threshold {
        return full;
    }
    unified_diff(&got, &want)
}

/// Unified diff from `got` to `want`.
pub fn unified_diff(got: &str, want: &str) -> String {
    let got = format!("{got}\n");
    let want = format!("{want}\n");
    TextDiff::from_lines(&got, &want)
        .unified_diff()
        .context_radius(3)
        .header("got", "want")
        .to_string()
}
