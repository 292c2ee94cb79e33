// Error types for tag parsing

use std::io;

use thiserror::Error;

/// Errors that abort a `read` call.
///
/// A corrupt extended header is not listed here: it ends frame parsing early
/// but the read still succeeds.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The `ID3` signature was found but the version or flag bytes are invalid.
    #[error("malformed ID3v2 header (version {major}.{minor}, flags {flags:#04x})")]
    MalformedHeader { major: u8, minor: u8, flags: u8 },

    /// The source is too small to hold an ID3v1 trailer.
    #[error("file too small for an ID3v1 trailer ({size} bytes)")]
    TruncatedFile { size: u64 },

    /// The source returned fewer bytes than a fixed-size structure needs.
    #[error("short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// The storage collaborator could not open the named file.
    #[error("failed to open {name}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;
