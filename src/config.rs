// Parser options

use serde::{Deserialize, Serialize};

/// How Latin-1 (encoding byte 0) text and ID3v1 fields become UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Latin1Handling {
    /// Map each byte to its code point (Windows-1252 superset).
    #[default]
    Transcode,
    /// Keep the raw bytes. Sequences that are not valid UTF-8 become U+FFFD.
    PassThrough,
}

/// How UTF-16 surrogate pairs are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrogateHandling {
    /// Join a high/low pair into one 4-byte sequence.
    #[default]
    Combine,
    /// Encode each half on its own as a 3-byte sequence.
    Independent,
}

/// Options for [`crate::Id3Reader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    pub latin1: Latin1Handling,
    pub surrogates: SurrogateHandling,
    /// Read the ID3v1 trailer when an `ID3` header is present but malformed.
    pub fallback_to_v1_on_malformed: bool,
    /// Read v2.3 frame sizes as plain big-endian integers instead of syncsafe.
    pub plain_v23_frame_sizes: bool,
    /// Follow the per-version extended header layout: v2.4 sizes include the
    /// header itself, v2.3 sizes are plain and exclude their own 4 bytes.
    pub standard_extended_header: bool,
    /// Ignore an ID3v1 trailer that does not start with `TAG`.
    pub require_v1_marker: bool,
}

impl ReadOptions {
    /// Raw behavior: Latin-1 bytes kept as-is and surrogate halves encoded separately.
    pub fn raw() -> Self {
        ReadOptions {
            latin1: Latin1Handling::PassThrough,
            surrogates: SurrogateHandling::Independent,
            fallback_to_v1_on_malformed: false,
            plain_v23_frame_sizes: false,
            standard_extended_header: false,
            require_v1_marker: false,
        }
    }

    /// Load options from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
