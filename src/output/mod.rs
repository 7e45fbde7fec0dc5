//! Sinks for the final variable set: dry-run listing, keychain write, exec.

pub mod exec;

use std::io::{self, Write};

use crate::models::EnvVar;
use crate::sources::envfile::encode_env_text;
use crate::sources::keychain::{CredentialStore, StoreError};

/// Print `KEY=VALUE` lines sorted by key.
pub fn write_dry_run(out: &mut impl Write, vars: &[EnvVar]) -> io::Result<()> {
    let mut sorted = vars.to_vec();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    out.write_all(encode_env_text(&sorted).as_bytes())?;
    out.flush()
}

/// Persist the final variables into a keychain namespace.
pub fn write_keychain(
    store: &mut dyn CredentialStore,
    namespace: &str,
    service_prefix: &str,
    vars: &[EnvVar],
) -> Result<(), StoreError> {
    tracing::info!(
        namespace,
        service = %format!("{service_prefix}{namespace}"),
        count = vars.len(),
        "writing variables to keychain"
    );
    store.put_namespace(namespace, service_prefix, vars)
}
