// CLI module for id3scan
//
// Command-line shell over the library: argument parsing, commands and output
// formatting. Only compiled into the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
