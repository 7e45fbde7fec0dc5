//! Variable sources and the I/O capabilities they read through.
//!
//! Each reader turns one input (a file, a literal, a keychain namespace,
//! stdin, or a prompt) into an ordered `Vec<EnvVar>`. Readers never touch
//! the process directly: file access, standard input, the credential store
//! and the interactive prompt are all reached through [`SourceIo`], so the
//! whole pipeline can run against in-memory doubles.

pub mod define;
pub mod envfile;
pub mod jsonfile;
pub mod keychain;
pub mod prompt;
pub mod stdin;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::EnvVar;
use keychain::{CredentialStore, KeyringStore, StoreError};
use prompt::{Prompter, TerminalPrompter};

/// Failure of a format decoder. Never includes raw input text.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid format at line {line}: expected KEY=VALUE")]
    InvalidLine { line: usize },

    #[error("empty variable name at line {line}")]
    EmptyKey { line: usize },

    #[error("invalid variable name in entry {entry}: must be non-empty and contain no `=` or NUL")]
    InvalidKey { entry: usize },

    #[error("invalid define: expected KEY=VALUE")]
    InvalidDefine,

    #[error("invalid JSON object of strings: {0}")]
    Json(#[source] serde_json::Error),

    #[error("failed to parse AWS assume role response: {0}")]
    AwsAssumeRole(#[source] serde_json::Error),

    #[error("input is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while reading a source. All of them abort the run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {kind} {}: {source}", path.display())]
    Read {
        kind: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to decode {kind} {location}: {source}")]
    Decode {
        kind: &'static str,
        location: String,
        source: DecodeError,
    },

    #[error("`{0}` is not a valid input format, must be [json|env|aws-assume-role]")]
    InvalidInputFormat(String),

    #[error("keychain items not found in namespace `{namespace}` (service `{service}`)")]
    CredentialNamespaceEmpty { namespace: String, service: String },

    #[error("failed to access keychain namespace `{namespace}`: {source}")]
    CredentialStore {
        namespace: String,
        source: StoreError,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to prompt for `{name}`: {source}")]
    Prompt { name: String, source: io::Error },
}

/// Read access to files by path.
pub trait FileSource {
    /// Return the full contents of `path`. A missing file must surface as
    /// [`io::ErrorKind::NotFound`].
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`FileSource`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFiles;

impl FileSource for OsFiles {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// The external capabilities the resolution pipeline reads through.
pub struct SourceIo {
    pub files: Box<dyn FileSource>,
    pub stdin: Box<dyn Read>,
    pub prompter: Box<dyn Prompter>,
    pub keychain: Box<dyn CredentialStore>,
}

impl SourceIo {
    /// Real filesystem, process stdin, terminal prompt, and OS keyring.
    pub fn system() -> Self {
        Self {
            files: Box::new(OsFiles),
            stdin: Box::new(io::stdin()),
            prompter: Box::new(TerminalPrompter),
            keychain: Box::new(KeyringStore),
        }
    }

    pub fn with_files(mut self, files: impl FileSource + 'static) -> Self {
        self.files = Box::new(files);
        self
    }

    pub fn with_stdin(mut self, stdin: impl Read + 'static) -> Self {
        self.stdin = Box::new(stdin);
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    pub fn with_keychain(mut self, keychain: impl CredentialStore + 'static) -> Self {
        self.keychain = Box::new(keychain);
        self
    }
}

/// Log each variable a source contributed (keys only).
pub(crate) fn trace_vars(kind: &str, vars: &[EnvVar]) {
    for var in vars {
        tracing::debug!(source = kind, key = %var.key, "add a new variable");
    }
}
