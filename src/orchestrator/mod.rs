//! Resolution pipeline: config → scopes → sources → deduplication.
//!
//! Data flows one way and strictly sequentially. Any error aborts the
//! pipeline; there is no partial result.

pub mod aggregate;
pub mod dedup;

use std::path::PathBuf;

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::{ConfigDocument, ConfigError, ConfigFragment, EffectiveConfig, merge_scopes};
use crate::models::EnvVar;
use crate::sources::{FileSource, SourceError, SourceIo};

pub use aggregate::collect_vars;
pub use dedup::{OverwriteDenied, deduplicate};

/// Any failure of the resolution pipeline.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Overwrite(#[from] OverwriteDenied),
}

/// Inputs for one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Config document to load.
    pub config_path: PathBuf,
    /// Built-in config location; a missing file here is not an error.
    pub default_config_path: PathBuf,
    pub profile: String,
    /// Directory used to select workdir scopes.
    pub cwd: PathBuf,
    /// Fragment synthesized from command-line flags; merged last.
    pub cli: ConfigFragment,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: EffectiveConfig,
    /// Final variables, one per key.
    pub vars: IndexMap<String, EnvVar>,
}

impl Resolution {
    /// Final variables ordered by key.
    pub fn sorted(&self) -> Vec<EnvVar> {
        let mut vars: Vec<EnvVar> = self.vars.values().cloned().collect();
        vars.sort_by(|a, b| a.key.cmp(&b.key));
        vars
    }
}

/// Load the config document and merge all applicable scopes.
pub fn load_effective_config(
    request: &ResolveRequest,
    files: &dyn FileSource,
) -> Result<EffectiveConfig, ConfigError> {
    let document =
        ConfigDocument::load(&request.config_path, &request.default_config_path, files)?;
    let config = merge_scopes(
        document.as_ref(),
        &request.profile,
        &request.cwd,
        &request.cli,
    )?;
    tracing::debug!(
        profile = %request.profile,
        overwrite = %config.overwrite,
        env_files = config.env_files.len(),
        json_files = config.json_files.len(),
        defines = config.defines.len(),
        keychains = config.keychains.len(),
        "resolved effective config"
    );
    Ok(config)
}

/// Run the full pipeline and return the final variable set.
pub fn resolve(request: &ResolveRequest, io: &mut SourceIo) -> Result<Resolution, ResolveError> {
    let config = load_effective_config(request, io.files.as_ref())?;
    let collected = collect_vars(&config, io)?;
    let vars = deduplicate(collected, config.overwrite)?;
    Ok(Resolution { config, vars })
}
