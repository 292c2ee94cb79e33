// CLI command implementations
use std::io::{self, Write};

use anyhow::{Context, Result};
use id3scan::{Id3Reader, LocalStorage, ReadOptions, Storage};
use tracing::debug;

use crate::cli::output::OutputFormatter;

/// Expand glob patterns. Arguments that match nothing are kept as plain paths
/// so the open failure is reported against them.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matches: Vec<String> = glob::glob(pattern)
            .with_context(|| format!("invalid pattern {}", pattern))?
            .filter_map(|entry| entry.ok())
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        debug!(pattern = %pattern, matches = matches.len(), "expanded");
        if matches.is_empty() {
            files.push(pattern.clone());
        } else {
            files.extend(matches);
        }
    }
    Ok(files)
}

/// Read tags from files. Returns the number of files that failed.
pub fn command_read(
    files: &[String],
    options: ReadOptions,
    formatter: &OutputFormatter,
) -> Result<usize> {
    let mut storage = LocalStorage::current_dir();
    let mut reader = Id3Reader::with_options(options);
    let mut stdout = io::stdout().lock();
    let mut failures = 0;

    for file_path in expand_patterns(files)? {
        match reader.read_file(&mut storage, &file_path) {
            Ok(()) => formatter.output_tag(&file_path, reader.result(), &mut stdout)?,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                failures += 1;
            }
        }
    }

    stdout.flush()?;
    Ok(failures)
}

/// Detect the tag kind of files. Returns the number of files that failed.
pub fn command_detect(files: &[String], formatter: &OutputFormatter) -> Result<usize> {
    let mut storage = LocalStorage::current_dir();
    let mut stdout = io::stdout().lock();
    let mut failures = 0;

    for file_path in expand_patterns(files)? {
        let kind = storage
            .open(&file_path)
            .with_context(|| format!("failed to open {}", file_path))
            .and_then(|mut file| Id3Reader::probe(&mut file).map_err(anyhow::Error::from));

        match kind {
            Ok(kind) => formatter.output_kind(&file_path, kind, &mut stdout)?,
            Err(e) => {
                formatter.print_error(&format!("{}: {:#}", file_path, e));
                failures += 1;
            }
        }
    }

    stdout.flush()?;
    Ok(failures)
}
