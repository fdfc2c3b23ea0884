//! Assertion configuration.
//!
//! [`AssertConfig`] carries the few tunables the assertions use: the preview
//! length for long strings in failure messages, the point at which a value
//! dump switches to a unified diff, and the [`FailurePolicy`].

use core::fmt;
use core::str::FromStr;

/// Environment variable overriding [`AssertConfig::preview_len`].
pub const ENV_PREVIEW_LEN: &str = "ASSERT_CONTEXT_PREVIEW_LEN";
/// Environment variable overriding [`AssertConfig::diff_threshold`].
pub const ENV_DIFF_THRESHOLD: &str = "ASSERT_CONTEXT_DIFF_THRESHOLD";
/// Environment variable overriding [`AssertConfig::policy`].
pub const ENV_POLICY: &str = "ASSERT_CONTEXT_POLICY";

/// Default preview length for `contains` and `panics` failure messages.
pub const DEFAULT_PREVIEW_LEN: usize = 50;
/// Default size (in characters) above which `equal` reports a diff.
pub const DEFAULT_DIFF_THRESHOLD: usize = 200;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Preview length too small to hold both halves around the ellipsis
    #[error("preview length must be at least 2, got {0}")]
    PreviewTooShort(usize),

    /// Diff threshold of zero would diff every failure, even single scalars
    #[error("diff threshold must be greater than zero")]
    ZeroDiffThreshold,

    /// Unknown failure policy name
    #[error("unknown failure policy {0:?} (expected \"fatal\" or \"continue\")")]
    UnknownPolicy(String),

    /// Environment variable holds a value that does not parse
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// What happens after an assertion failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FailurePolicy {
    /// Abandon the rest of the test immediately.
    #[default]
    Fatal,
    /// Record the failure and keep running; the host raises every recorded
    /// failure when the context is dropped.
    Continue,
}

impl FailurePolicy {
    /// Whether a failure stops the test.
    pub fn is_fatal(self) -> bool {
        matches!(self, FailurePolicy::Fatal)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Fatal => write!(f, "fatal"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(FailurePolicy::Fatal),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Assertion tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssertConfig {
    /// Strings longer than this many characters are shortened to their
    /// first and last `preview_len / 2` characters around `...`.
    pub preview_len: usize,
    /// When the expected/got dump of a failed `equal` is longer than this,
    /// a unified diff is reported instead.
    pub diff_threshold: usize,
    /// Fatal or continue-and-aggregate.
    pub policy: FailurePolicy,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            preview_len: DEFAULT_PREVIEW_LEN,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            policy: FailurePolicy::Fatal,
        }
    }
}

impl AssertConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preview length.
    pub fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }

    /// Set the diff threshold.
    pub fn with_diff_threshold(mut self, diff_threshold: usize) -> Self {
        self.diff_threshold = diff_threshold;
        self
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PreviewTooShort`] or
    /// [`ConfigError::ZeroDiffThreshold`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_len < 2 {
            return Err(ConfigError::PreviewTooShort(self.preview_len));
        }
        if self.diff_threshold == 0 {
            return Err(ConfigError::ZeroDiffThreshold);
        }
        Ok(())
    }

    /// Defaults overridden by the `ASSERT_CONTEXT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse, or the
    /// resulting configuration does not validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`AssertConfig::from_env`] with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AssertConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_PREVIEW_LEN) {
            config.preview_len = parse_usize(ENV_PREVIEW_LEN, value)?;
        }
        if let Some(value) = lookup(ENV_DIFF_THRESHOLD) {
            config.diff_threshold = parse_usize(ENV_DIFF_THRESHOLD, value)?;
        }
        if let Some(value) = lookup(ENV_POLICY) {
            config.policy = value.parse()?;
        }
        config.validate()?;
        tracing::debug!(
            preview_len = config.preview_len,
            diff_threshold = config.diff_threshold,
            policy = %config.policy,
            "loaded assertion config from environment"
        );
        Ok(config)
    }
}

fn parse_usize(var: &'static str, value: String) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AssertConfig::default();
        assert_eq!(config.preview_len, 50);
        assert_eq!(config.diff_threshold, 200);
        assert_eq!(config.policy, FailurePolicy::Fatal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tiny_preview() {
        let config = AssertConfig::new().with_preview_len(1);
        assert_eq!(config.validate(), Err(ConfigError::PreviewTooShort(1)));
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let config = AssertConfig::new().with_diff_threshold(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroDiffThreshold));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("fatal".parse::<FailurePolicy>(), Ok(FailurePolicy::Fatal));
        assert_eq!(" Continue ".parse::<FailurePolicy>(), Ok(FailurePolicy::Continue));
        assert!(matches!(
            "later".parse::<FailurePolicy>(),
            Err(ConfigError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AssertConfig::from_lookup(lookup_from(&[
            (ENV_PREVIEW_LEN, "20"),
            (ENV_POLICY, "continue"),
        ]))
        .unwrap();
        assert_eq!(config.preview_len, 20);
        assert_eq!(config.diff_threshold, DEFAULT_DIFF_THRESHOLD);
        assert_eq!(config.policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_from_lookup_invalid_number() {
        let err = AssertConfig::from_lookup(lookup_from(&[(ENV_DIFF_THRESHOLD, "lots")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_DIFF_THRESHOLD,
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_from_lookup_validates() {
        let err = AssertConfig::from_lookup(lookup_from(&[(ENV_PREVIEW_LEN, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::PreviewTooShort(0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_partial_config_uses_defaults() {
        let config: AssertConfig =
            serde_json::from_str(r#"{"preview_len": 20, "policy": "continue"}"#).unwrap();
        assert_eq!(config.preview_len, 20);
        assert_eq!(config.diff_threshold, DEFAULT_DIFF_THRESHOLD);
        assert_eq!(config.policy, FailurePolicy::Continue);
    }
}
