//! CLI argument parsing and logging setup.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::LogLevel;

/// Install the stderr log subscriber.
///
/// `RUST_LOG`, when set and valid, wins over `--log-level`.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::from(level).into()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
