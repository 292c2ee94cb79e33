//! id3scan - read title, artist, album, genre, track and year from ID3 tags
//!
//! The parser looks for an ID3v2 tag at the start of a source and falls back
//! to the 128-byte ID3v1 trailer at its end. Only the text frames that carry
//! those six fields are decoded; audio data is never touched.
//!
//! ```no_run
//! use id3scan::{Id3Reader, LocalStorage};
//!
//! let mut reader = Id3Reader::new();
//! let mut storage = LocalStorage::current_dir();
//! if reader.read_file(&mut storage, "track.mp3").is_ok() {
//!     println!("{}", reader.title().unwrap_or("(untitled)"));
//! }
//! ```

pub mod config;
pub mod error;
pub mod field_mapping;
pub mod id3;
pub mod metadata;
pub mod reader;
pub mod storage;
pub mod utils;

pub use config::{Latin1Handling, ReadOptions, SurrogateHandling};
pub use error::{ParseError, ParseResult};
pub use field_mapping::StandardField;
pub use metadata::{TagKind, TagResult};
pub use reader::Id3Reader;
pub use storage::{LocalStorage, Storage, StreamSource, TagSource};
