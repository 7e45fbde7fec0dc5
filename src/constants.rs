//! App-wide constants.
//!
//! Centralises the tool name, config paths, profile defaults, and
//! credential-store naming so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "altenv";

/// Crate version, shown by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config filename placed in the user's home directory (`~/.altenv`).
pub const CONFIG_FILENAME: &str = ".altenv";

/// Profile used when none is requested. A missing section with this
/// name is treated as empty rather than an error.
pub const DEFAULT_PROFILE: &str = "default";

/// Prefix prepended to a keychain namespace to form the service name.
pub const DEFAULT_KEYCHAIN_SERVICE_PREFIX: &str = "altenv.";

/// Reserved account holding the JSON list of keys stored in a namespace.
pub const KEYCHAIN_INDEX_ACCOUNT: &str = "__altenv_keys__";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_CONFIG: &str = "ALTENV_CONFIG";
pub const ENV_PROFILE: &str = "ALTENV_PROFILE";
pub const ENV_HOME: &str = "HOME";
