// Encoding utilities

use encoding_rs::WINDOWS_1252;

use crate::config::{Latin1Handling, SurrogateHandling};

/// Text encoding types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => TextEncoding::Iso8859_1,
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16BE,
            3 => TextEncoding::Utf8,
            _ => TextEncoding::Iso8859_1,
        }
    }
}

/// Byte order of 16-bit code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

const REPLACEMENT: [u8; 3] = [0xEF, 0xBF, 0xBD];

/// Convert UTF-16 text to UTF-8 bytes.
///
/// A leading byte-order mark (`FE FF` or `FF FE`) is consumed and overrides
/// `default_order`. Conversion stops at the first NUL code unit; a trailing odd
/// byte is ignored.
pub fn utf16_to_utf8(data: &[u8], default_order: ByteOrder, surrogates: SurrogateHandling) -> Vec<u8> {
    let (order, body) = match data {
        [0xFE, 0xFF, rest @ ..] => (ByteOrder::BigEndian, rest),
        [0xFF, 0xFE, rest @ ..] => (ByteOrder::LittleEndian, rest),
        _ => (default_order, data),
    };

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| match order {
            ByteOrder::BigEndian => u16::from_be_bytes([pair[0], pair[1]]),
            ByteOrder::LittleEndian => u16::from_le_bytes([pair[0], pair[1]]),
        })
        .take_while(|&unit| unit != 0)
        .collect();

    let mut out = Vec::with_capacity(units.len() * 3);
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        i += 1;

        if surrogates == SurrogateHandling::Combine && (0xD800..0xE000).contains(&unit) {
            let low = units.get(i).copied().filter(|u| (0xDC00..0xE000).contains(u));
            match (unit < 0xDC00, low) {
                (true, Some(low)) => {
                    i += 1;
                    let code = 0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                    push_four_bytes(&mut out, code);
                }
                _ => out.extend_from_slice(&REPLACEMENT),
            }
            continue;
        }

        push_code_unit(&mut out, unit);
    }
    out
}

/// 1, 2 or 3 byte UTF-8 sequence for a single 16-bit value.
fn push_code_unit(out: &mut Vec<u8>, code: u16) {
    if code < 0x80 {
        out.push(code as u8);
    } else if code < 0x800 {
        out.push(((code >> 6) as u8) | 0xC0);
        out.push(((code & 0x3F) as u8) | 0x80);
    } else {
        out.push(((code >> 12) as u8) | 0xE0);
        out.push((((code >> 6) & 0x3F) as u8) | 0x80);
        out.push(((code & 0x3F) as u8) | 0x80);
    }
}

fn push_four_bytes(out: &mut Vec<u8>, code: u32) {
    out.push(((code >> 18) as u8) | 0xF0);
    out.push((((code >> 12) & 0x3F) as u8) | 0x80);
    out.push((((code >> 6) & 0x3F) as u8) | 0x80);
    out.push(((code & 0x3F) as u8) | 0x80);
}

/// Decode single-byte text, stopping at the first NUL.
///
/// Leading bytes that look like a byte order mark are ordinary characters.
pub fn decode_latin1(data: &[u8], handling: Latin1Handling) -> String {
    let data = until_nul(data);
    match handling {
        Latin1Handling::Transcode => {
            WINDOWS_1252.decode_without_bom_handling(data).0.into_owned()
        }
        Latin1Handling::PassThrough => String::from_utf8_lossy(data).into_owned(),
    }
}

/// Decode UTF-8 text, stopping at the first NUL.
pub fn decode_utf8(data: &[u8]) -> String {
    String::from_utf8_lossy(until_nul(data)).into_owned()
}

/// Store converter output as a string. Invalid sequences become U+FFFD.
pub fn utf8_bytes_to_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn until_nul(data: &[u8]) -> &[u8] {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    &data[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BE: ByteOrder = ByteOrder::BigEndian;

    #[test]
    fn test_little_endian_bom() {
        let out = utf16_to_utf8(&[0xFF, 0xFE, 0x41, 0x00], BE, SurrogateHandling::Combine);
        assert_eq!(out, b"A");
    }

    #[test]
    fn test_big_endian_bom() {
        let out = utf16_to_utf8(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42], ByteOrder::LittleEndian, SurrogateHandling::Combine);
        assert_eq!(out, b"AB");
    }

    #[test]
    fn test_default_order_without_bom() {
        assert_eq!(utf16_to_utf8(&[0x00, 0x42], BE, SurrogateHandling::Combine), b"B");
        assert_eq!(utf16_to_utf8(&[0x42, 0x00], ByteOrder::LittleEndian, SurrogateHandling::Combine), b"B");
    }

    #[test]
    fn test_two_and_three_byte_ranges() {
        // U+00E9, U+20AC
        let out = utf16_to_utf8(&[0x00, 0xE9, 0x20, 0xAC], BE, SurrogateHandling::Combine);
        assert_eq!(out, "é€".as_bytes());
    }

    #[test]
    fn test_stops_at_nul_unit() {
        let out = utf16_to_utf8(&[0xFF, 0xFE, 0x41, 0x00, 0x00, 0x00, 0x42, 0x00], BE, SurrogateHandling::Combine);
        assert_eq!(out, b"A");
    }

    #[test]
    fn test_odd_trailing_byte_ignored() {
        assert_eq!(utf16_to_utf8(&[0x00, 0x41, 0x42], BE, SurrogateHandling::Combine), b"A");
    }

    #[test]
    fn test_bom_only_is_empty() {
        assert!(utf16_to_utf8(&[0xFF, 0xFE], BE, SurrogateHandling::Combine).is_empty());
        assert!(utf16_to_utf8(&[], BE, SurrogateHandling::Combine).is_empty());
    }

    #[test]
    fn test_surrogate_pair_combined() {
        // U+1F600 = D83D DE00
        let out = utf16_to_utf8(&[0xD8, 0x3D, 0xDE, 0x00], BE, SurrogateHandling::Combine);
        assert_eq!(out, "😀".as_bytes());
    }

    #[test]
    fn test_surrogate_pair_independent() {
        let out = utf16_to_utf8(&[0xD8, 0x3D, 0xDE, 0x00], BE, SurrogateHandling::Independent);
        assert_eq!(out, vec![0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]);
        assert!(String::from_utf8(out).is_err());
    }

    #[test]
    fn test_lone_surrogate_replaced() {
        let out = utf16_to_utf8(&[0xDE, 0x00, 0x00, 0x41], BE, SurrogateHandling::Combine);
        assert_eq!(utf8_bytes_to_string(out), "\u{FFFD}A");
    }

    #[test]
    fn test_latin1_handling() {
        let data = [b'C', b'a', b'f', 0xE9, 0x00, b'x'];
        assert_eq!(decode_latin1(&data, Latin1Handling::Transcode), "Café");
        assert_eq!(decode_latin1(&data, Latin1Handling::PassThrough), "Caf\u{FFFD}");
    }

    #[test]
    fn test_latin1_ignores_bom_like_bytes() {
        let data = [0xFF, 0xFE, b'a', b'b'];
        assert_eq!(decode_latin1(&data, Latin1Handling::Transcode), "ÿþab");
        let data = [0xEF, 0xBB, 0xBF, b'x'];
        assert_eq!(decode_latin1(&data, Latin1Handling::Transcode), "ï»¿x");
    }

    #[test]
    fn test_utf8_stops_at_nul() {
        assert_eq!(decode_utf8("naïve\0junk".as_bytes()), "naïve");
    }
}
