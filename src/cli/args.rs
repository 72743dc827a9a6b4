//! CLI argument definitions using clap
//!
//! Commands:
//! - cms-rest start --config <path> [--port <port>] [--verbose]
//! - cms-rest check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "./cms-rest.json";

/// cms-rest - REST API over a single document collection
#[derive(Parser, Debug)]
#[command(name = "cms-rest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Port override
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
