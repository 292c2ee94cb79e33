// Metadata field mapping
//
// Maps ID3v2 frame identifiers onto the fields a tag read produces, and
// converts genre references into display names so ID3v1 and ID3v2 tags
// report genres the same way.

use crate::id3::genres::GENRES;

/// Standard metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
    Title,
    Artist,
    Album,
    Genre,
    Track,
    Year,
}

impl StandardField {
    pub const ALL: [StandardField; 6] = [
        StandardField::Title,
        StandardField::Artist,
        StandardField::Album,
        StandardField::Genre,
        StandardField::Track,
        StandardField::Year,
    ];

    /// Get standard field name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Title => "title",
            StandardField::Artist => "artist",
            StandardField::Album => "album",
            StandardField::Genre => "genre",
            StandardField::Track => "track",
            StandardField::Year => "year",
        }
    }

    /// Parse from string
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
    }

    /// Field a frame with this identifier is stored into, if any.
    pub fn from_frame_id(id: &[u8; 4]) -> Option<Self> {
        FieldMappings::from_id3v2(id)
    }
}

/// ID3v2 frame identifiers
pub struct FieldMappings;

impl FieldMappings {
    pub const ID3V2_TITLE: &'static [u8; 4] = b"TIT2";
    pub const ID3V2_ARTIST: &'static [u8; 4] = b"TPE1";
    pub const ID3V2_ALBUM: &'static [u8; 4] = b"TALB";
    pub const ID3V2_GENRE: &'static [u8; 4] = b"TCON";
    pub const ID3V2_TRACK: &'static [u8; 4] = b"TRCK";
    pub const ID3V2_YEAR: &'static [u8; 4] = b"TYER";

    /// Get ID3v2 frame ID for a standard field
    pub fn to_id3v2(field: StandardField) -> &'static [u8; 4] {
        match field {
            StandardField::Title => Self::ID3V2_TITLE,
            StandardField::Artist => Self::ID3V2_ARTIST,
            StandardField::Album => Self::ID3V2_ALBUM,
            StandardField::Genre => Self::ID3V2_GENRE,
            StandardField::Track => Self::ID3V2_TRACK,
            StandardField::Year => Self::ID3V2_YEAR,
        }
    }

    /// Convert ID3v2 frame to standard field
    pub fn from_id3v2(frame_id: &[u8; 4]) -> Option<StandardField> {
        match frame_id {
            b"TIT2" => Some(StandardField::Title),
            b"TPE1" => Some(StandardField::Artist),
            b"TALB" => Some(StandardField::Album),
            b"TCON" => Some(StandardField::Genre),
            b"TRCK" => Some(StandardField::Track),
            b"TYER" | b"TDRC" => Some(StandardField::Year),
            _ => None,
        }
    }
}

/// Metadata value converter for format-specific value encodings
pub struct ValueConverter;

impl ValueConverter {
    /// Genre name for an ID3v1 genre index.
    pub fn parse_genre_id3v1(genre_id: u8) -> Option<&'static str> {
        GENRES.get(genre_id as usize).copied()
    }

    /// Resolve an ID3v2 content type (`TCON`) to a display name.
    ///
    /// Numeric references such as `"(17)"`, `"(17)Rock"` and `"17"` become the
    /// table name; `"(RX)"` and `"(CR)"` are Remix and Cover. Anything else,
    /// including refinements after a reference, is returned unchanged.
    pub fn resolve_content_type(value: &str) -> String {
        let trimmed = value.trim();

        if let Some(rest) = trimmed.strip_prefix('(') {
            // "((" escapes a literal parenthesis
            if rest.starts_with('(') {
                return rest.to_string();
            }
            if let Some((reference, refinement)) = rest.split_once(')') {
                let resolved = match reference {
                    "RX" => Some("Remix"),
                    "CR" => Some("Cover"),
                    n => n.parse::<u8>().ok().and_then(Self::parse_genre_id3v1),
                };
                return match resolved {
                    Some(name) => name.to_string(),
                    None if !refinement.is_empty() => refinement.to_string(),
                    None => trimmed.to_string(),
                };
            }
        }

        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(name) = trimmed.parse::<u8>().ok().and_then(Self::parse_genre_id3v1) {
                return name.to_string();
            }
        }

        trimmed.to_string()
    }
}
