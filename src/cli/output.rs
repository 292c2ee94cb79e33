// Output formatting for CLI

use std::io::Write;

use anyhow::Result;
use id3scan::{StandardField, TagKind, TagResult};
use serde::Serialize;

use crate::cli::config::OutputFormat;

#[derive(Serialize)]
struct FileReport<'a, T: Serialize> {
    file: &'a str,
    #[serde(flatten)]
    body: T,
}

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the fields read from one file
    pub fn output_tag(&self, file: &str, tag: &TagResult, writer: &mut impl Write) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        match self.format {
            OutputFormat::Pretty | OutputFormat::Json => {
                self.output_json(&FileReport { file, body: tag }, writer)?
            }
            OutputFormat::KeyValue => {
                writeln!(writer, "file: {}", file)?;
                writeln!(writer, "kind: {}", tag.kind)?;
                for field in StandardField::ALL {
                    writeln!(writer, "{}: {}", field.as_str(), tag.get(field).unwrap_or("(none)"))?;
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Output the tag kind detected in one file
    pub fn output_kind(&self, file: &str, kind: TagKind, writer: &mut impl Write) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        match self.format {
            OutputFormat::Pretty | OutputFormat::Json => {
                #[derive(Serialize)]
                struct Kind {
                    kind: TagKind,
                }
                self.output_json(&FileReport { file, body: Kind { kind } }, writer)?
            }
            OutputFormat::KeyValue => writeln!(writer, "{}: {}", file, kind)?,
        }
        Ok(())
    }

    fn output_json(&self, value: &impl Serialize, writer: &mut impl Write) -> Result<()> {
        let text = match self.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
            _ => serde_json::to_string(value)?,
        };
        writeln!(writer, "{}", text)?;
        Ok(())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagResult {
        let mut tag = TagResult::with_kind(TagKind::V1);
        tag.set(StandardField::Title, "Song".to_string());
        tag
    }

    #[test]
    fn test_key_value_output() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::KeyValue, false)
            .output_tag("a.mp3", &sample(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("kind: ID3v1"));
        assert!(text.contains("title: Song"));
        assert!(text.contains("artist: (none)"));
    }

    #[test]
    fn test_json_output_is_flat() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json, false)
            .output_tag("a.mp3", &sample(), &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["file"], "a.mp3");
        assert_eq!(value["title"], "Song");
        assert_eq!(value["kind"]["type"], "v1");
    }

    #[test]
    fn test_quiet_suppresses_output() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json, true)
            .output_kind("a.mp3", TagKind::None, &mut out)
            .unwrap();
        assert!(out.is_empty());
    }
}
