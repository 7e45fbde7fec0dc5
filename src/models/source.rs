//! Source descriptors: where variables come from.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use strum::{AsRefStr, EnumString};

/// A file-backed source (flat env file or JSON file).
///
/// In the config document an entry is either a bare path string or a
/// table `{ path = "...", required = false }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub path: PathBuf,
    pub required: Option<bool>,
}

impl FileSpec {
    /// A file that must exist.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: None,
        }
    }

    /// A file that is silently skipped when missing.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: Some(false),
        }
    }

    /// Files are required unless explicitly marked otherwise.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }
}

impl<'de> Deserialize<'de> for FileSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Path(PathBuf),
            Table {
                path: PathBuf,
                #[serde(default)]
                required: Option<bool>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Path(path) => FileSpec::required(path),
            Raw::Table { path, required } => FileSpec { path, required },
        })
    }
}

/// A credential-store namespace to read every variable from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainSpec {
    pub namespace: String,
    pub service_prefix: String,
}

impl KeychainSpec {
    /// Full service name under which the namespace's entries live.
    pub fn service(&self) -> String {
        format!("{}{}", self.service_prefix, self.namespace)
    }
}

/// Formats accepted on standard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum StdinFormat {
    /// Flat JSON object of string values.
    #[strum(serialize = "json")]
    Json,
    /// Flat `KEY=VALUE` lines.
    #[strum(serialize = "env")]
    Env,
    /// Response body of `aws sts assume-role`.
    #[strum(serialize = "aws-assume-role")]
    AwsAssumeRole,
}
