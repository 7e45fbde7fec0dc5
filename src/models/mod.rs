//! Shared types used across all modules.
//!
//! This module defines the variable pair, the overwrite policy, and the
//! source descriptors. Other modules import from here rather than
//! reaching into each other's internals.

pub mod source;

use std::fmt;

use strum::{AsRefStr, EnumString};

pub use source::{FileSpec, KeychainSpec, StdinFormat};

/// A single environment variable produced by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    /// Case-sensitive, non-empty variable name.
    pub key: String,
    /// Value; may be empty.
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether `key` can name a process environment variable: non-empty,
    /// with no `=` and no NUL.
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && !key.contains(['=', '\0'])
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Rule applied when two sources supply the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OverwritePolicy {
    /// Abort the run on the first repeated key.
    #[default]
    Deny,
    /// Log a warning and keep the later value.
    Warn,
    /// Keep the later value silently.
    Allow,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_policy_parses_known_names() {
        assert_eq!("deny".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Deny);
        assert_eq!("warn".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Warn);
        assert_eq!("allow".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Allow);
    }

    #[test]
    fn overwrite_policy_rejects_unknown_and_case_variants() {
        assert!("xxx".parse::<OverwritePolicy>().is_err());
        assert!("Deny".parse::<OverwritePolicy>().is_err());
        assert!("".parse::<OverwritePolicy>().is_err());
    }

    #[test]
    fn overwrite_policy_defaults_to_deny() {
        assert_eq!(OverwritePolicy::default(), OverwritePolicy::Deny);
        assert_eq!(OverwritePolicy::Warn.to_string(), "warn");
    }

    #[test]
    fn valid_keys() {
        assert!(EnvVar::is_valid_key("COLOR"));
        assert!(EnvVar::is_valid_key("lower.case-1"));
        assert!(!EnvVar::is_valid_key(""));
        assert!(!EnvVar::is_valid_key("A=B"));
        assert!(!EnvVar::is_valid_key("NUL\0BYTE"));
    }

    #[test]
    fn env_var_display_is_key_equals_value() {
        assert_eq!(EnvVar::new("COLOR", "BLUE").to_string(), "COLOR=BLUE");
        assert_eq!(EnvVar::new("EMPTY", "").to_string(), "EMPTY=");
    }
}
