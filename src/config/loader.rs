//! Config document loading.
//!
//! The document is TOML with three top-level sections:
//!
//! ```toml
//! [global]            # always applied
//! [profile.<name>]    # applied when <name> is the selected profile
//! [workdir.<name>]    # applied when the cwd is under its `dirpath`
//! ```
//!
//! A missing file is only tolerated at the built-in default location.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use super::error::ConfigError;
use super::fragment::ConfigFragment;
use crate::sources::FileSource;

/// Parsed on-disk configuration: one fragment per scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    pub global: ConfigFragment,

    #[serde(rename = "profile")]
    pub profiles: BTreeMap<String, ConfigFragment>,

    /// Keyed by workdir name; iteration is lexical by name.
    #[serde(rename = "workdir")]
    pub workdirs: BTreeMap<String, ConfigFragment>,
}

impl ConfigDocument {
    /// Load the document at `path` through `files`.
    ///
    /// Returns `Ok(None)` when `path` does not exist and equals
    /// `default_path`; a missing explicitly supplied path is
    /// [`ConfigError::NotFound`].
    pub fn load(
        path: &Path,
        default_path: &Path,
        files: &dyn FileSource,
    ) -> Result<Option<Self>, ConfigError> {
        let raw = match files.read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if path != default_path {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                tracing::debug!(path = %path.display(), "config file does not exist");
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        let content = String::from_utf8(raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let document = Self::parse(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            profiles = document.profiles.len(),
            workdirs = document.workdirs.len(),
            "loaded config file"
        );
        Ok(Some(document))
    }

    /// Parse and validate document text. `path` is only used for errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let document: ConfigDocument = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        document.validate()?;
        Ok(document)
    }

    /// Every workdir scope must declare a non-empty `dirpath`.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, workdir) in &self.workdirs {
            if workdir.dir_path.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Validation {
                    scope: format!("workdir.{name}"),
                    reason: "workdir has no `dirpath` field".to_string(),
                });
            }
        }
        Ok(())
    }
}
