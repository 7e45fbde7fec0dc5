//! Variable aggregation across every configured source.
//!
//! Sources are read in a fixed order, which decides which value counts as
//! the earlier one during deduplication:
//!
//! 1. env files, 2. JSON files, 3. defines, 4. keychain namespaces,
//! 5. stdin, 6. prompt.
//!
//! The first failing source aborts aggregation. A missing env or JSON file
//! marked `required = false` is the only tolerated failure.

use std::io::{ErrorKind, Read};

use crate::config::EffectiveConfig;
use crate::models::{EnvVar, FileSpec, KeychainSpec, StdinFormat};
use crate::sources::define::parse_define;
use crate::sources::envfile::decode_env_text;
use crate::sources::jsonfile::decode_json;
use crate::sources::keychain::CredentialStore;
use crate::sources::prompt::Prompter;
use crate::sources::stdin::decode_stdin;
use crate::sources::{DecodeError, FileSource, SourceError, SourceIo, trace_vars};

const ENV_FILE: &str = "env file";
const JSON_FILE: &str = "JSON file";

/// Read every source named by `config`, concatenated in evaluation order.
pub fn collect_vars(
    config: &EffectiveConfig,
    io: &mut SourceIo,
) -> Result<Vec<EnvVar>, SourceError> {
    let mut vars = Vec::new();

    for spec in &config.env_files {
        vars.extend(read_file_source(ENV_FILE, spec, io.files.as_ref(), decode_env_text)?);
    }

    for spec in &config.json_files {
        vars.extend(read_file_source(JSON_FILE, spec, io.files.as_ref(), decode_json)?);
    }

    for (idx, raw) in config.defines.iter().enumerate() {
        let var = parse_define(raw).map_err(|source| SourceError::Decode {
            kind: "define",
            location: format!("#{}", idx + 1),
            source,
        })?;
        tracing::debug!(key = %var.key, "set defined variable");
        vars.push(var);
    }

    for spec in &config.keychains {
        vars.extend(read_keychain(spec, io.keychain.as_ref())?);
    }

    if let Some(format) = &config.stdin {
        vars.extend(read_stdin(format, io)?);
    }

    if let Some(name) = &config.prompt {
        vars.push(read_prompt(name, io.prompter.as_ref())?);
    }

    Ok(vars)
}

fn read_file_source(
    kind: &'static str,
    spec: &FileSpec,
    files: &dyn FileSource,
    decode: fn(&[u8]) -> Result<Vec<EnvVar>, DecodeError>,
) -> Result<Vec<EnvVar>, SourceError> {
    tracing::debug!(path = %spec.path.display(), "read {kind}");

    let raw = match files.read(&spec.path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound && !spec.is_required() => {
            tracing::debug!(
                path = %spec.path.display(),
                "{kind} is not found, but ignore because not required"
            );
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SourceError::Read {
                kind,
                path: spec.path.clone(),
                source,
            });
        }
    };

    let vars = decode(&raw).map_err(|source| SourceError::Decode {
        kind,
        location: spec.path.display().to_string(),
        source,
    })?;
    trace_vars(kind, &vars);
    Ok(vars)
}

fn read_keychain(
    spec: &KeychainSpec,
    store: &dyn CredentialStore,
) -> Result<Vec<EnvVar>, SourceError> {
    tracing::debug!(namespace = %spec.namespace, service = %spec.service(), "read keychain");

    let vars = store
        .query_namespace(&spec.namespace, &spec.service_prefix)
        .map_err(|source| SourceError::CredentialStore {
            namespace: spec.namespace.clone(),
            source,
        })?;

    if vars.is_empty() {
        return Err(SourceError::CredentialNamespaceEmpty {
            namespace: spec.namespace.clone(),
            service: spec.service(),
        });
    }
    trace_vars("keychain", &vars);
    Ok(vars)
}

fn read_stdin(format: &str, io: &mut SourceIo) -> Result<Vec<EnvVar>, SourceError> {
    let format: StdinFormat = format
        .parse()
        .map_err(|_| SourceError::InvalidInputFormat(format.to_string()))?;
    tracing::debug!(format = format.as_ref(), "read stdin");

    let mut raw = Vec::new();
    io.stdin.read_to_end(&mut raw).map_err(SourceError::Stdin)?;

    let vars = decode_stdin(format, &raw).map_err(|source| SourceError::Decode {
        kind: "stdin",
        location: format.as_ref().to_string(),
        source,
    })?;
    trace_vars("stdin", &vars);
    Ok(vars)
}

fn read_prompt(name: &str, prompter: &dyn Prompter) -> Result<EnvVar, SourceError> {
    let value = prompter
        .prompt_secret(name)
        .map_err(|source| SourceError::Prompt {
            name: name.to_string(),
            source,
        })?;
    tracing::debug!(key = name, "read prompt");
    Ok(EnvVar::new(name, value))
}
