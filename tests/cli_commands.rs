//! Integration tests for the run modes.
//!
//! These tests exercise the library functions behind each run mode,
//! using the public API from the altenv crate.

use std::io;

use altenv::config::ConfigFragment;
use altenv::models::{EnvVar, FileSpec};
use altenv::orchestrator::{ResolveRequest, resolve};
use altenv::output::{self, exec::ExecError};
use altenv::sources::SourceIo;
use altenv::sources::keychain::{CredentialStore, MemoryStore};
use altenv::sources::prompt::FixedPrompter;
use pretty_assertions::assert_eq;

fn request(dir: &tempfile::TempDir, cli: ConfigFragment) -> ResolveRequest {
    ResolveRequest {
        config_path: dir.path().join(".altenv"),
        default_config_path: dir.path().join(".altenv"),
        profile: "default".to_string(),
        cwd: dir.path().to_path_buf(),
        cli,
    }
}

fn test_io() -> SourceIo {
    SourceIo::system()
        .with_stdin(io::empty())
        .with_prompter(FixedPrompter("PROMPTED".into()))
        .with_keychain(MemoryStore::new())
}

// ---------------------------------------------------------------------------
// dryrun
// ---------------------------------------------------------------------------

#[test]
fn dryrun_prints_sorted_pairs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("my.env"), "ZETA=last\nALPHA=first\n").unwrap();
    let cli = ConfigFragment {
        env_files: vec![FileSpec::required(dir.path().join("my.env"))],
        defines: vec!["MIDDLE=a=b".into()],
        ..Default::default()
    };

    let resolution = resolve(&request(&dir, cli), &mut test_io()).unwrap();
    let mut out = Vec::new();
    output::write_dry_run(&mut out, &resolution.sorted()).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "ALPHA=first\nMIDDLE=a=b\nZETA=last\n"
    );
}

#[test]
fn dryrun_output_decodes_back_to_the_same_set() {
    let dir = tempfile::tempdir().unwrap();
    let cli = ConfigFragment {
        defines: vec!["B=2".into(), "A=1".into()],
        ..Default::default()
    };
    let resolution = resolve(&request(&dir, cli), &mut test_io()).unwrap();
    let mut out = Vec::new();
    output::write_dry_run(&mut out, &resolution.sorted()).unwrap();

    let decoded = altenv::sources::envfile::decode_env_text(&out).unwrap();
    assert_eq!(decoded, resolution.sorted());
}

// ---------------------------------------------------------------------------
// update-keychain
// ---------------------------------------------------------------------------

#[test]
fn update_keychain_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let cli = ConfigFragment {
        defines: vec!["TOKEN=s3cret".into(), "USER=me".into()],
        write_keychain: Some("work".into()),
        ..Default::default()
    };
    let mut io = test_io();
    let resolution = resolve(&request(&dir, cli), &mut io).unwrap();
    let namespace = resolution.config.write_keychain.clone().unwrap();
    output::write_keychain(
        io.keychain.as_mut(),
        &namespace,
        &resolution.config.keychain_service_prefix,
        &resolution.sorted(),
    )
    .unwrap();

    // A later run reads the namespace as a keychain source.
    let cli = ConfigFragment {
        keychains: vec!["work".into()],
        ..Default::default()
    };
    let again = resolve(&request(&dir, cli), &mut io).unwrap();
    assert_eq!(again.sorted(), resolution.sorted());
}

#[test]
fn update_keychain_merges_into_existing_namespace() {
    let mut store = MemoryStore::new();
    store
        .put_namespace("work", "altenv.", &[EnvVar::new("OLD", "1")])
        .unwrap();
    output::write_keychain(&mut store, "work", "altenv.", &[EnvVar::new("NEW", "2")]).unwrap();

    let mut keys: Vec<_> = store
        .query_namespace("work", "altenv.")
        .unwrap()
        .into_iter()
        .map(|v| v.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["NEW", "OLD"]);
}

// ---------------------------------------------------------------------------
// exec
// ---------------------------------------------------------------------------

#[test]
fn exec_without_command_fails() {
    let err = output::exec::exec_command(&[], &[EnvVar::new("A", "1")]).unwrap_err();
    assert!(matches!(err, ExecError::NoCommand));
}
