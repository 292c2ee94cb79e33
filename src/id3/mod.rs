// ID3 metadata handling module
pub mod frames;
pub mod genres;
pub mod v1;
pub mod v2;

pub use v1::Id3v1Tag;
pub use v2::{read_v2, ExtendedHeader, FrameHeader, TagHeader};
