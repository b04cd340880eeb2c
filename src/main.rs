//! incompat - encoding compatibility scanner.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use incompat::cli::{self, Cli, Commands};
use incompat::config::{EngineConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    incompat::core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    incompat::logger::set_verbose(cli.verbose);

    let config = init_config(EngineConfig::load(cli)?);

    match &cli.command {
        Commands::Scan { strict, .. } => {
            let found = cli::scan::scan_file(&config, cli.file())?;
            if found && *strict {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Watch { .. } => cli::watch::watch_file(config, cli.file()),
    }
}
