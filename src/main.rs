//! altenv: run a command with layered environment variables.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! error propagation and user-facing messages.

mod cli;

use altenv::env::Env;
use altenv::orchestrator::{self, ResolveRequest};
use altenv::output::{self, exec::ExecError};
use altenv::sources::SourceIo;

use std::io;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use cli::args::{Cli, RunMode};

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.log_level);

    // Usage errors are reported before any source is read.
    match cli.run_mode {
        RunMode::Exec if cli.command.is_empty() => return Err(ExecError::NoCommand.into()),
        RunMode::UpdateKeychain if cli.write_keychain.as_deref().is_none_or(str::is_empty) => {
            bail!("--write-keychain <NS> is required for the update-keychain run mode")
        }
        _ => {}
    }

    let default_config_path = Env::real().default_config_path();
    let request = ResolveRequest {
        config_path: cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path.clone()),
        default_config_path,
        profile: cli.profile.clone(),
        cwd: std::env::current_dir().context("failed to determine the working directory")?,
        cli: cli.to_fragment(),
    };

    let mut io = SourceIo::system();
    let resolution = orchestrator::resolve(&request, &mut io)?;
    let vars = resolution.sorted();
    tracing::debug!(count = vars.len(), "resolved environment variables");

    match cli.run_mode {
        RunMode::Exec => {
            let never = output::exec::exec_command(&cli.command, &vars)?;
            match never {}
        }
        RunMode::Dryrun => {
            output::write_dry_run(&mut io::stdout().lock(), &vars)
                .context("failed to write variables to stdout")?;
        }
        RunMode::UpdateKeychain => {
            let config = &resolution.config;
            let Some(namespace) = config.write_keychain.as_deref() else {
                bail!("--write-keychain <NS> is required for the update-keychain run mode");
            };
            output::write_keychain(
                io.keychain.as_mut(),
                namespace,
                &config.keychain_service_prefix,
                &vars,
            )
            .with_context(|| format!("failed to update keychain namespace `{namespace}`"))?;
        }
    }

    Ok(())
}
