//! CLI module for cms-rest
//!
//! Provides command-line interface for:
//! - start: Load configuration and serve the REST API
//! - check-config: Validate configuration and print it

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, effective_config, run, run_command, start};
pub use errors::{CliError, CliErrorCode, CliResult};
