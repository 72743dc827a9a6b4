//! CLI command implementations

use std::path::Path;

use tracing::info;

use crate::http_server::{HttpServer, ServiceConfig};
use crate::logging;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start {
            config,
            port,
            verbose,
        } => start(&config, port, verbose),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Resolve the effective configuration: file (or defaults) plus port override
pub fn effective_config(config_path: &Path, port: Option<u16>) -> CliResult<ServiceConfig> {
    let mut config = ServiceConfig::load_or_default(config_path)?;

    if let Some(port) = port {
        config.port = port;
        config.validate()?;
    }

    Ok(config)
}

/// Start the HTTP server and block until it stops
pub fn start(config_path: &Path, port: Option<u16>, verbose: bool) -> CliResult<()> {
    logging::init(verbose);

    let config = effective_config(config_path, port)?;
    info!(
        "Starting cms-rest on {} (store '{}', collection '{}')",
        config.socket_addr(),
        config.connection_string,
        config.collection
    );

    let server = HttpServer::with_config(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Validate the configuration and print it as JSON
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = effective_config(config_path, None)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
