//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so the default config
//! location can be exercised without touching the process environment.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::{CONFIG_FILENAME, ENV_HOME};

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Built-in config location: `$HOME/.altenv`.
    ///
    /// Falls back to the platform home directory when `HOME` is unset or
    /// empty, and to a relative `.altenv` when neither is known.
    pub fn default_config_path(&self) -> PathBuf {
        let home = self
            .var(ENV_HOME)
            .ok()
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                // Mocked environments never consult the OS.
                self.overrides.is_none().then(dirs::home_dir).flatten()
            });

        match home {
            Some(dir) => dir.join(CONFIG_FILENAME),
            None => PathBuf::from(CONFIG_FILENAME),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
