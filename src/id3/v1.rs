// ID3v1 tag implementation

use tracing::{debug, warn};

use crate::config::Latin1Handling;
use crate::error::{ParseError, ParseResult};
use crate::field_mapping::{StandardField, ValueConverter};
use crate::metadata::{TagKind, TagResult};
use crate::storage::{read_full, TagSource};
use crate::utils::encoding::decode_latin1;

/// ID3v1 tag structure
#[derive(Debug, Default)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub track: Option<u8>,
    pub genre: u8,
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];

    /// Read the trailer from the last 128 bytes of the source.
    ///
    /// Fails with `TruncatedFile` when the source is smaller than a trailer.
    /// With `require_marker`, returns `None` when the trailer does not start
    /// with `TAG`; otherwise the fixed fields are read regardless.
    pub fn read<S: TagSource + ?Sized>(
        source: &mut S,
        latin1: Latin1Handling,
        require_marker: bool,
    ) -> ParseResult<Option<Self>> {
        let size = source.size();
        let Some(offset) = size.checked_sub(Self::TAG_SIZE as u64) else {
            warn!(size, "file too small for ID3v1");
            return Err(ParseError::TruncatedFile { size });
        };

        source.seek(offset)?;
        let mut buffer = [0u8; Self::TAG_SIZE];
        read_full(source, &mut buffer, offset)?;

        if buffer[0..3] != Self::TAG_ID {
            if require_marker {
                debug!(offset, "no ID3v1 trailer");
                return Ok(None);
            }
            debug!(offset, "ID3v1 trailer without TAG marker");
        }

        Ok(Some(Self::parse(&buffer, latin1)))
    }

    /// Parse ID3v1 tag from buffer
    pub fn parse(buffer: &[u8; 128], latin1: Latin1Handling) -> Self {
        let text = |range: std::ops::Range<usize>| Self::parse_string(&buffer[range], latin1);

        // ID3v1.1: a zero in comment byte 28 followed by a non-zero byte is a track number
        let track = (buffer[125] == 0 && buffer[126] != 0).then_some(buffer[126]);

        Id3v1Tag {
            title: text(3..33),
            artist: text(33..63),
            album: text(63..93),
            year: text(93..97),
            track,
            genre: buffer[127],
        }
    }

    /// Genre name, when the index is inside the genre table.
    pub fn genre_name(&self) -> Option<&'static str> {
        ValueConverter::parse_genre_id3v1(self.genre)
    }

    /// Map the fixed fields onto a tag result.
    pub fn into_result(self) -> TagResult {
        let mut result = TagResult::with_kind(TagKind::V1);
        if let Some(genre) = self.genre_name() {
            result.set(StandardField::Genre, genre.to_string());
        }
        result.set(StandardField::Title, self.title);
        result.set(StandardField::Artist, self.artist);
        result.set(StandardField::Album, self.album);
        result.set(StandardField::Year, self.year);
        if let Some(track) = self.track {
            result.set(StandardField::Track, track.to_string());
        }
        result
    }

    /// Fixed-width field up to the first NUL, without trailing space padding.
    fn parse_string(bytes: &[u8], latin1: Latin1Handling) -> String {
        decode_latin1(bytes, latin1).trim_end().to_string()
    }
}
