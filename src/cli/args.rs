//! Clap argument types and the command-line config fragment.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use altenv::config::ConfigFragment;
use altenv::constants::{DEFAULT_PROFILE, ENV_CONFIG, ENV_PROFILE};
use altenv::models::FileSpec;

/// Run a command with environment variables layered from files, keychains,
/// stdin and a config file.
#[derive(Parser, Debug)]
#[command(name = altenv::constants::APP_NAME, version = altenv::constants::VERSION)]
pub struct Cli {
    // --- Sources ---
    /// Env file to read (KEY=VALUE lines). Repeatable.
    #[arg(short = 'e', long = "env", value_name = "PATH")]
    pub env_files: Vec<PathBuf>,

    /// JSON file to read (flat object of strings). Repeatable.
    #[arg(short = 'j', long = "json", value_name = "PATH")]
    pub json_files: Vec<PathBuf>,

    /// Literal variable definition. Repeatable.
    #[arg(short = 'd', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Keychain namespace to read. Repeatable.
    #[arg(short = 'k', long = "keychain", value_name = "NS")]
    pub keychains: Vec<String>,

    /// Service name prefix for keychain entries (default: "altenv.").
    #[arg(long, value_name = "PREFIX")]
    pub keychain_service_prefix: Option<String>,

    /// Read variables from stdin in this format: json, env, aws-assume-role.
    #[arg(short = 'i', long = "input", value_name = "FORMAT")]
    pub input: Option<String>,

    /// Prompt for a secret value and store it under this variable name.
    #[arg(long, value_name = "NAME")]
    pub prompt: Option<String>,

    // --- Config ---
    /// Config profile to apply.
    #[arg(short = 'p', long, env = ENV_PROFILE, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Config file (default: $HOME/.altenv).
    #[arg(short = 'c', long, env = ENV_CONFIG, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Policy for repeated keys: deny, warn, allow (default: deny).
    #[arg(long, value_name = "POLICY")]
    pub overwrite: Option<String>,

    // --- Run ---
    /// Log level, overridden by RUST_LOG.
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// What to do with the resolved variables.
    #[arg(short = 'r', long, value_enum, default_value_t = RunMode::Exec)]
    pub run_mode: RunMode,

    /// Keychain namespace written by the update-keychain run mode.
    #[arg(short = 'w', long, value_name = "NS")]
    pub write_keychain: Option<String>,

    /// Command to run and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// What happens after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Replace this process with the command.
    Exec,
    /// Print KEY=VALUE lines sorted by key.
    Dryrun,
    /// Store the variables in the keychain namespace given by --write-keychain.
    UpdateKeychain,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Cli {
    /// The config fragment contributed by flags. Merged after every scope
    /// of the config document. Files named on the command line are required.
    pub fn to_fragment(&self) -> ConfigFragment {
        ConfigFragment {
            env_files: self.env_files.iter().map(FileSpec::required).collect(),
            json_files: self.json_files.iter().map(FileSpec::required).collect(),
            defines: self.defines.clone(),
            keychains: self.keychains.clone(),
            overwrite: self.overwrite.clone(),
            keychain_service_prefix: self.keychain_service_prefix.clone(),
            prompt: self.prompt.clone(),
            stdin: self.input.clone(),
            write_keychain: self.write_keychain.clone(),
            dir_path: None,
        }
    }
}
