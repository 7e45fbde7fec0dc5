//! Launch the target command with the resolved variables.
//!
//! On Unix the current process image is replaced. Elsewhere the command is
//! spawned and this process exits with the child's status code.

use std::convert::Infallible;
use std::process::Command;

use thiserror::Error;

use crate::models::EnvVar;

/// Errors from launching the command.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("no command given")]
    NoCommand,

    #[error("invalid environment variable name: must be non-empty and contain no `=` or NUL")]
    InvalidName,

    #[error("failed to exec `{program}`: {source}")]
    Exec {
        program: String,
        source: std::io::Error,
    },
}

/// Build the command: inherits the parent environment, then `vars`
/// are added or override inherited values.
pub fn build_command(args: &[String], vars: &[EnvVar]) -> Result<Command, ExecError> {
    let (program, rest) = args.split_first().ok_or(ExecError::NoCommand)?;
    if !vars.iter().all(|v| EnvVar::is_valid_key(&v.key)) {
        return Err(ExecError::InvalidName);
    }
    let mut command = Command::new(program);
    command
        .args(rest)
        .envs(vars.iter().map(|v| (v.key.as_str(), v.value.as_str())));
    Ok(command)
}

/// Replace the current process with `args[0] args[1..]`.
///
/// Only returns on failure.
#[cfg(unix)]
pub fn exec_command(args: &[String], vars: &[EnvVar]) -> Result<Infallible, ExecError> {
    use std::os::unix::process::CommandExt;

    let mut command = build_command(args, vars)?;
    tracing::debug!(program = %args[0], args = ?&args[1..], "exec command");
    let source = command.exec();
    Err(ExecError::Exec {
        program: args[0].clone(),
        source,
    })
}

/// Run `args[0] args[1..]` and exit with its status.
#[cfg(not(unix))]
pub fn exec_command(args: &[String], vars: &[EnvVar]) -> Result<Infallible, ExecError> {
    let mut command = build_command(args, vars)?;
    tracing::debug!(program = %args[0], args = ?&args[1..], "spawn command");
    let status = command.status().map_err(|source| ExecError::Exec {
        program: args[0].clone(),
        source,
    })?;
    std::process::exit(status.code().unwrap_or(1));
}
