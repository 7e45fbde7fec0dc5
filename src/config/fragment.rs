//! Configuration fragments and the effective configuration.
//!
//! A [`ConfigFragment`] is the partial configuration declared by one scope
//! (global, a profile, a workdir, or the command line). Fragments are never
//! mutated: [`ConfigFragment::merge`] returns a new fragment, and
//! [`ConfigFragment::finalize`] turns the fully merged result into an
//! [`EffectiveConfig`] that is read-only for the rest of the run.
//!
//! Merge rules:
//! - list fields concatenate, earlier entries first;
//! - scalar fields are replaced only by a later non-empty value;
//! - `dirpath` identifies a workdir scope and is never merged.

use serde::Deserialize;

use super::error::ConfigError;
use crate::constants::DEFAULT_KEYCHAIN_SERVICE_PREFIX;
use crate::models::{EnvVar, FileSpec, KeychainSpec, OverwritePolicy};

/// Partial configuration declared within one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFragment {
    #[serde(rename = "envfile")]
    pub env_files: Vec<FileSpec>,

    #[serde(rename = "jsonfile")]
    pub json_files: Vec<FileSpec>,

    /// Raw `KEY=VALUE` literals.
    #[serde(rename = "define")]
    pub defines: Vec<String>,

    /// Credential-store namespaces.
    #[serde(rename = "keychain")]
    pub keychains: Vec<String>,

    /// Unvalidated policy name; checked by [`ConfigFragment::finalize`].
    pub overwrite: Option<String>,

    #[serde(rename = "keychainServicePrefix")]
    pub keychain_service_prefix: Option<String>,

    /// Variable name to prompt for. Command line only.
    #[serde(skip)]
    pub prompt: Option<String>,

    /// Standard-input format name. Command line only.
    #[serde(skip)]
    pub stdin: Option<String>,

    /// Namespace written by the `update-keychain` run mode. Command line only.
    #[serde(skip)]
    pub write_keychain: Option<String>,

    /// Directory prefix activating a workdir scope.
    #[serde(rename = "dirpath", alias = "dirPath")]
    pub dir_path: Option<String>,
}

impl ConfigFragment {
    /// Combine `self` with a fragment merged after it.
    pub fn merge(&self, later: &ConfigFragment) -> ConfigFragment {
        ConfigFragment {
            env_files: concat(&self.env_files, &later.env_files),
            json_files: concat(&self.json_files, &later.json_files),
            defines: concat(&self.defines, &later.defines),
            keychains: concat(&self.keychains, &later.keychains),
            overwrite: pick(&self.overwrite, &later.overwrite),
            keychain_service_prefix: pick(
                &self.keychain_service_prefix,
                &later.keychain_service_prefix,
            ),
            prompt: pick(&self.prompt, &later.prompt),
            stdin: pick(&self.stdin, &later.stdin),
            write_keychain: pick(&self.write_keychain, &later.write_keychain),
            dir_path: self.dir_path.clone(),
        }
    }

    /// Resolve defaults and validate the merged fragment.
    ///
    /// The overwrite policy defaults to `deny`; any name outside
    /// `deny|warn|allow` is rejected.
    pub fn finalize(&self) -> Result<EffectiveConfig, ConfigError> {
        let overwrite = match self.overwrite.as_deref() {
            None => OverwritePolicy::default(),
            Some(raw) => raw
                .parse::<OverwritePolicy>()
                .map_err(|_| ConfigError::InvalidOverwritePolicy(raw.to_string()))?,
        };

        let service_prefix = self
            .keychain_service_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_KEYCHAIN_SERVICE_PREFIX.to_string());

        let prompt = non_empty(&self.prompt);
        if prompt.as_deref().is_some_and(|name| !EnvVar::is_valid_key(name)) {
            return Err(ConfigError::Validation {
                scope: "prompt".to_string(),
                reason: "variable name must contain no `=` or NUL".to_string(),
            });
        }

        let keychains = self
            .keychains
            .iter()
            .map(|namespace| KeychainSpec {
                namespace: namespace.clone(),
                service_prefix: service_prefix.clone(),
            })
            .collect();

        Ok(EffectiveConfig {
            env_files: self.env_files.clone(),
            json_files: self.json_files.clone(),
            defines: self.defines.clone(),
            keychains,
            overwrite,
            keychain_service_prefix: service_prefix,
            prompt,
            stdin: non_empty(&self.stdin),
            write_keychain: non_empty(&self.write_keychain),
        })
    }
}

/// The single configuration produced by merging every applicable scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub env_files: Vec<FileSpec>,
    pub json_files: Vec<FileSpec>,
    pub defines: Vec<String>,
    pub keychains: Vec<KeychainSpec>,
    pub overwrite: OverwritePolicy,
    pub keychain_service_prefix: String,
    pub prompt: Option<String>,
    pub stdin: Option<String>,
    pub write_keychain: Option<String>,
}

fn concat<T: Clone>(earlier: &[T], later: &[T]) -> Vec<T> {
    earlier.iter().chain(later).cloned().collect()
}

fn pick(earlier: &Option<String>, later: &Option<String>) -> Option<String> {
    match later {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => earlier.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}
