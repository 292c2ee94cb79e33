// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// id3scan - ID3 tag reader
#[derive(Parser, Debug)]
#[command(name = "id3scan")]
#[command(about = "Read track metadata from ID3v1/ID3v2 tags", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (only report failures)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging to stderr)
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON file with parser options
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read tags from audio file(s)
    Read {
        /// Audio file paths or glob patterns
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Report which tag version a file carries
    Detect {
        /// Audio file paths or glob patterns
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },
}
