// CLI binary entry point for id3scan

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use id3scan::ReadOptions;
use tracing_subscriber::EnvFilter;

use cli::commands::{command_detect, command_read};
use cli::{Commands, Config, OutputFormatter};

fn init_logging(verbose: bool) {
    let default = if verbose { "id3scan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(config: &Config) -> Result<ReadOptions> {
    match &config.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ReadOptions::from_json(&json).with_context(|| format!("invalid options in {}", path.display()))
        }
        None => Ok(ReadOptions::default()),
    }
}

fn run(config: &Config) -> Result<usize> {
    let formatter = OutputFormatter::new(config.format, config.quiet);
    match &config.command {
        Commands::Read { files } => command_read(files, load_options(config)?, &formatter),
        Commands::Detect { files } => command_detect(files, &formatter),
    }
}

fn main() {
    let config = Config::parse();
    init_logging(config.verbose);

    match run(&config) {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}
