// ID3v2 tag implementation

use tracing::{debug, trace, warn};

use crate::config::ReadOptions;
use crate::error::{ParseError, ParseResult};
use crate::field_mapping::{StandardField, ValueConverter};
use crate::id3::frames::decode_text_frame;
use crate::metadata::{TagKind, TagResult};
use crate::storage::{read_full, TagSource};
use crate::utils::io::{decode_syncsafe, field};

/// ID3v2 header structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub signature: [u8; 3],
    pub version: (u8, u8),
    pub flags: u8,
    /// Tag size excluding the 10-byte header.
    pub size: u32,
}

impl TagHeader {
    pub const SIZE: usize = 10;
    pub const SIGNATURE: [u8; 3] = *b"ID3";

    pub const FLAG_EXTENDED_HEADER: u8 = 0x40;
    const RESERVED_FLAGS: u8 = 0x0F;

    /// Decode the header fields from their fixed offsets.
    pub fn parse(buffer: &[u8; Self::SIZE]) -> Self {
        TagHeader {
            signature: field::<3>(buffer, 0),
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: decode_syncsafe(field::<4>(buffer, 6)),
        }
    }

    /// True when the signature is `ID3`.
    pub fn is_v2(&self) -> bool {
        self.signature == Self::SIGNATURE
    }

    /// Reject version bytes of 0xFF, majors below 2 and set reserved flag bits.
    pub fn validate(&self) -> ParseResult<()> {
        let (major, minor) = self.version;
        if major < 2 || major == 0xFF || minor == 0xFF || self.flags & Self::RESERVED_FLAGS != 0 {
            return Err(ParseError::MalformedHeader {
                major,
                minor,
                flags: self.flags,
            });
        }
        Ok(())
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags & Self::FLAG_EXTENDED_HEADER != 0
    }

    /// Absolute offset of the first byte after the tag.
    pub fn tag_end(&self) -> u64 {
        self.size as u64 + Self::SIZE as u64
    }

    /// Read the header at offset 0.
    ///
    /// Returns `None` when the source is too small for a header or does not
    /// start with the `ID3` signature.
    pub fn read<S: TagSource + ?Sized>(source: &mut S) -> ParseResult<Option<Self>> {
        if source.size() < Self::SIZE as u64 {
            return Ok(None);
        }

        source.seek(0)?;
        let mut buffer = [0u8; Self::SIZE];
        read_full(source, &mut buffer, 0)?;

        let header = Self::parse(&buffer);
        Ok(header.is_v2().then_some(header))
    }
}

/// Where frame parsing continues after the extended header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedHeader {
    /// First frame starts at this absolute offset.
    Skipped { next: u64 },
    /// The declared size is below the minimum; frames are not parsed.
    Corrupt { size: u32 },
}

impl ExtendedHeader {
    /// Fixed prefix: 4-byte size, then flag bytes.
    pub const PREFIX_SIZE: usize = 6;
    pub const MIN_SIZE: u32 = 6;

    /// Consume the extended header that starts at `cursor`.
    ///
    /// By default the size is syncsafe and the skip starts after the 6-byte
    /// prefix. With `standard_layout`, v2.4 sizes count the whole extended
    /// header and v2.3 sizes are plain integers that leave out their own
    /// 4 bytes.
    pub fn skip<S: TagSource + ?Sized>(
        source: &mut S,
        cursor: u64,
        version: (u8, u8),
        standard_layout: bool,
    ) -> ParseResult<Self> {
        let mut prefix = [0u8; Self::PREFIX_SIZE];
        read_full(source, &mut prefix, cursor)?;

        let raw = field::<4>(&prefix, 0);
        let (size, next) = match (standard_layout, version.0 >= 4) {
            (false, _) => {
                let size = decode_syncsafe(raw);
                (size, cursor + Self::PREFIX_SIZE as u64 + size as u64)
            }
            (true, true) => {
                let size = decode_syncsafe(raw);
                (size, cursor + size as u64)
            }
            (true, false) => {
                let size = u32::from_be_bytes(raw);
                (size, cursor + 4 + size as u64)
            }
        };

        if size < Self::MIN_SIZE {
            return Ok(ExtendedHeader::Corrupt { size });
        }

        source.seek(next)?;
        Ok(ExtendedHeader::Skipped { next })
    }
}

/// ID3v2 frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: [u8; 4],
    /// Payload length in bytes.
    pub size: u32,
    pub flags: [u8; 2],
}

impl FrameHeader {
    pub const SIZE: usize = 10;

    /// Decode a frame header. Sizes are syncsafe unless `plain_size` is set.
    pub fn parse(buffer: &[u8; Self::SIZE], plain_size: bool) -> Self {
        let raw = field::<4>(buffer, 4);
        FrameHeader {
            id: field::<4>(buffer, 0),
            size: if plain_size {
                u32::from_be_bytes(raw)
            } else {
                decode_syncsafe(raw)
            },
            flags: field::<2>(buffer, 8),
        }
    }

    /// Padding after the last frame: the first three id bytes are zero.
    pub fn is_padding(&self) -> bool {
        self.id[..3].iter().all(|&b| b == 0)
    }

    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// Parse the frames of a v2 tag whose header was already read from offset 0.
///
/// The returned result holds whatever recognised frames appeared before the
/// first padding frame or the end of the tag.
pub fn read_v2<S: TagSource + ?Sized>(
    source: &mut S,
    header: &TagHeader,
    options: &ReadOptions,
) -> ParseResult<TagResult> {
    header.validate()?;

    let (major, minor) = header.version;
    let mut result = TagResult::with_kind(TagKind::V2 { major, minor });
    let tag_end = header.tag_end();
    let mut cursor = TagHeader::SIZE as u64;

    debug!(major, minor, flags = header.flags, tag_end, "ID3v2 header");

    if header.has_extended_header() {
        match ExtendedHeader::skip(
            source,
            cursor,
            header.version,
            options.standard_extended_header,
        )? {
            ExtendedHeader::Skipped { next } => {
                debug!(next, "skipped extended header");
                cursor = next;
            }
            ExtendedHeader::Corrupt { size } => {
                warn!(size, "extended header too small, skipping to end of tag");
                source.seek(tag_end)?;
                return Ok(result);
            }
        }
    }

    let plain_size = options.plain_v23_frame_sizes && major == 3;

    while cursor < tag_end {
        // No room left for a frame header plus any payload
        if cursor + FrameHeader::SIZE as u64 >= tag_end {
            break;
        }

        let mut buffer = [0u8; FrameHeader::SIZE];
        read_full(source, &mut buffer, cursor)?;
        let frame = FrameHeader::parse(&buffer, plain_size);
        cursor += FrameHeader::SIZE as u64;

        if frame.is_padding() {
            debug!(offset = cursor, "reached padding");
            break;
        }

        let size = frame.size as u64;
        if cursor + size >= tag_end {
            debug!(id = %frame.id_str(), size, "frame runs to end of tag");
            break;
        }

        // Refuse to allocate for payloads the source cannot hold
        let available = source.size().saturating_sub(cursor);
        if size > available {
            warn!(id = %frame.id_str(), size, available, "frame larger than file");
            return Err(ParseError::ShortRead {
                offset: cursor,
                expected: frame.size as usize,
                actual: available as usize,
            });
        }

        let mut payload = vec![0u8; frame.size as usize];
        read_full(source, &mut payload, cursor)?;

        match StandardField::from_frame_id(&frame.id) {
            Some(target) => {
                let text = decode_text_frame(&payload, options);
                let text = match target {
                    StandardField::Genre => ValueConverter::resolve_content_type(&text),
                    _ => text,
                };
                debug!(id = %frame.id_str(), field = target.as_str(), "text frame");
                result.set(target, text);
            }
            None => trace!(id = %frame.id_str(), size, "skipping frame"),
        }

        cursor += size;
        source.seek(cursor)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StreamSource;
    use crate::utils::io::encode_syncsafe;

    fn header_bytes(major: u8, flags: u8, size: u32) -> Vec<u8> {
        let mut out = b"ID3".to_vec();
        out.extend_from_slice(&[major, 0, flags]);
        out.extend_from_slice(&encode_syncsafe(size));
        out
    }

    fn frame(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&encode_syncsafe(payload.len() as u32));
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(payload);
        out
    }

    fn tag(major: u8, flags: u8, body: &[u8], padding: usize) -> Vec<u8> {
        let mut out = header_bytes(major, flags, (body.len() + padding) as u32);
        out.extend_from_slice(body);
        out.extend(std::iter::repeat(0).take(padding));
        out
    }

    fn parse(bytes: Vec<u8>) -> ParseResult<TagResult> {
        parse_with(bytes, &ReadOptions::default())
    }

    fn parse_with(bytes: Vec<u8>, options: &ReadOptions) -> ParseResult<TagResult> {
        let mut source = StreamSource::from_bytes(bytes);
        let header = TagHeader::read(&mut source)?.expect("ID3 header");
        read_v2(&mut source, &header, options)
    }

    fn standard_ext() -> ReadOptions {
        ReadOptions {
            standard_extended_header: true,
            ..ReadOptions::default()
        }
    }

    #[test]
    fn test_header_fields() {
        let bytes: [u8; 10] = header_bytes(4, 0x40, 257).try_into().unwrap();
        let header = TagHeader::parse(&bytes);
        assert!(header.is_v2());
        assert_eq!(header.version, (4, 0));
        assert!(header.has_extended_header());
        assert_eq!(header.size, 257);
        assert_eq!(header.tag_end(), 267);
    }

    #[test]
    fn test_header_validation() {
        let check = |major: u8, minor: u8, flags: u8| TagHeader {
            signature: TagHeader::SIGNATURE,
            version: (major, minor),
            flags,
            size: 0,
        }
        .validate()
        .is_ok();

        assert!(check(2, 0, 0));
        assert!(check(3, 0, 0x80));
        assert!(check(4, 0, 0xF0));
        assert!(!check(1, 0, 0));
        assert!(!check(0xFF, 0, 0));
        assert!(!check(3, 0xFF, 0));
        assert!(!check(3, 0, 0x01));
    }

    #[test]
    fn test_non_id3_source_has_no_header() {
        let mut source = StreamSource::from_bytes(vec![0xFF; 64]);
        assert!(TagHeader::read(&mut source).unwrap().is_none());
        let mut tiny = StreamSource::from_bytes(b"ID3".to_vec());
        assert!(TagHeader::read(&mut tiny).unwrap().is_none());
    }

    #[test]
    fn test_frame_header_sizes() {
        let bytes: [u8; 10] = *b"TIT2\x00\x00\x01\x7F\x00\x00";
        assert_eq!(FrameHeader::parse(&bytes, false).size, 255);
        assert_eq!(FrameHeader::parse(&bytes, true).size, 383);
        assert!(!FrameHeader::parse(&bytes, false).is_padding());
        assert!(FrameHeader::parse(&[0u8; 10], false).is_padding());
    }

    #[test]
    fn test_reads_known_frames() {
        let mut body = frame(b"TIT2", b"\x00Hello");
        body.extend(frame(b"TPE1", &[0x01, 0xFF, 0xFE, b'A', 0, b'B', 0]));
        body.extend(frame(b"COMM", b"\x00engnot stored"));
        body.extend(frame(b"TCON", b"\x00(17)"));
        body.extend(frame(b"TRCK", b"\x003/12"));
        let result = parse(tag(3, 0, &body, 16)).unwrap();

        assert_eq!(result.title(), Some("Hello"));
        assert_eq!(result.artist(), Some("AB"));
        assert_eq!(result.genre(), Some("Rock"));
        assert_eq!(result.track(), Some("3/12"));
        assert_eq!(result.album(), None);
        assert_eq!(result.year(), None);
        assert_eq!(result.kind, TagKind::V2 { major: 3, minor: 0 });
    }

    #[test]
    fn test_repeated_frame_overwrites() {
        let mut body = frame(b"TALB", b"\x00First");
        body.extend(frame(b"TALB", b"\x00Second"));
        let result = parse(tag(4, 0, &body, 4)).unwrap();
        assert_eq!(result.album(), Some("Second"));
    }

    #[test]
    fn test_frame_reaching_tag_end_is_dropped() {
        let body = frame(b"TIT2", b"\x00Exact");
        let result = parse(tag(4, 0, &body, 0)).unwrap();
        assert_eq!(result.title(), None);
    }

    #[test]
    fn test_padding_stops_iteration() {
        let mut body = frame(b"TIT2", b"\x00Kept");
        body.extend_from_slice(&[0u8; 10]);
        body.extend(frame(b"TPE1", b"\x00Lost"));
        let result = parse(tag(4, 0, &body, 8)).unwrap();
        assert_eq!(result.title(), Some("Kept"));
        assert_eq!(result.artist(), None);
    }

    #[test]
    fn test_malformed_header_rejected() {
        let body = frame(b"TIT2", b"\x00Hello");
        assert!(matches!(
            parse(tag(1, 0, &body, 8)),
            Err(ParseError::MalformedHeader { major: 1, .. })
        ));
    }

    #[test]
    fn test_extended_header_skipped_after_prefix() {
        // first frame at 10 + 6 + size
        let mut body = encode_syncsafe(6).to_vec();
        body.extend_from_slice(&[1, 0]);
        body.extend_from_slice(&[0xEE; 6]);
        body.extend(frame(b"TIT2", b"\x00After ext"));
        let result = parse(tag(4, TagHeader::FLAG_EXTENDED_HEADER, &body, 8)).unwrap();
        assert_eq!(result.title(), Some("After ext"));
    }

    #[test]
    fn test_extended_header_size_is_syncsafe_for_v23() {
        let mut body = vec![0x00, 0x00, 0x01, 0x00, 0, 0];
        body.extend_from_slice(&[0xEE; 128]);
        body.extend(frame(b"TIT2", b"\x00After ext"));
        let result = parse(tag(3, TagHeader::FLAG_EXTENDED_HEADER, &body, 8)).unwrap();
        assert_eq!(result.title(), Some("After ext"));
    }

    #[test]
    fn test_v24_standard_extended_header() {
        let mut body = encode_syncsafe(6).to_vec();
        body.extend_from_slice(&[1, 0]);
        body.extend(frame(b"TIT2", b"\x00After ext"));
        let bytes = tag(4, TagHeader::FLAG_EXTENDED_HEADER, &body, 8);
        assert_eq!(parse_with(bytes, &standard_ext()).unwrap().title(), Some("After ext"));
    }

    #[test]
    fn test_v23_standard_extended_header() {
        let mut body = 6u32.to_be_bytes().to_vec();
        body.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        body.extend(frame(b"TIT2", b"\x00After ext"));
        let bytes = tag(3, TagHeader::FLAG_EXTENDED_HEADER, &body, 8);
        assert_eq!(parse_with(bytes, &standard_ext()).unwrap().title(), Some("After ext"));
    }

    #[test]
    fn test_corrupt_extended_header_ends_early() {
        let mut body = encode_syncsafe(3).to_vec();
        body.extend_from_slice(&[1, 0]);
        body.extend(frame(b"TIT2", b"\x00Skipped"));
        let mut bytes = tag(4, TagHeader::FLAG_EXTENDED_HEADER, &body, 8);
        let tag_end = bytes.len() as u64;
        bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);

        let mut source = StreamSource::from_bytes(bytes);
        let header = TagHeader::read(&mut source).unwrap().unwrap();
        let result = read_v2(&mut source, &header, &ReadOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(source.into_inner().position(), tag_end);
    }

    #[test]
    fn test_truncated_frame_is_short_read() {
        let mut bytes = header_bytes(4, 0, 100);
        bytes.extend_from_slice(b"TIT2");
        bytes.extend_from_slice(&encode_syncsafe(50));
        bytes.extend_from_slice(&[0, 0, 0, b'H', b'i']);
        assert!(matches!(parse(bytes), Err(ParseError::ShortRead { .. })));
    }

    #[test]
    fn test_truncated_frame_header_is_short_read() {
        let mut bytes = header_bytes(4, 0, 100);
        bytes.extend_from_slice(b"TIT");
        assert!(matches!(parse(bytes), Err(ParseError::ShortRead { offset: 10, .. })));
    }
}
