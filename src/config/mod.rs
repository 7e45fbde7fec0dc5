//! Configuration loading and layering.
//!
//! Handles the TOML config document, immutable per-scope fragments, and
//! the merge of global, workdir, profile, and command-line scopes into
//! one effective configuration.

pub mod error;
pub mod fragment;
pub mod loader;
pub mod scope;

pub use error::ConfigError;
pub use fragment::{ConfigFragment, EffectiveConfig};
pub use loader::ConfigDocument;
pub use scope::merge_scopes;
