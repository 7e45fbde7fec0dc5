//! Error types for configuration loading and scope merging.
//!
//! Every variant carries enough context (path, scope name, profile,
//! policy string) to diagnose the failure without re-running verbosely.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or merging configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file is not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// An existing config file could not be read or is not valid TOML.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document parsed but violates a structural rule.
    #[error("invalid config in `{scope}`: {reason}")]
    Validation { scope: String, reason: String },

    #[error("profile `{0}` is not found in config file")]
    ProfileNotFound(String),

    #[error("`{0}` is not a valid overwrite policy, must be [deny|warn|allow]")]
    InvalidOverwritePolicy(String),
}
