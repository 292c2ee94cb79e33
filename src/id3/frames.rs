// ID3 text frame decoding

use crate::config::ReadOptions;
use crate::utils::encoding::{self, ByteOrder};

pub use crate::utils::encoding::TextEncoding;

/// Decode a text frame payload: one encoding byte followed by the text.
///
/// Encodings 1 and 2 go through the UTF-16 converter (big-endian unless a
/// byte-order mark says otherwise). Unknown encoding bytes are read as Latin-1.
pub fn decode_text_frame(data: &[u8], options: &ReadOptions) -> String {
    let Some((&encoding, text)) = data.split_first() else {
        return String::new();
    };

    match TextEncoding::from_byte(encoding) {
        TextEncoding::Iso8859_1 => encoding::decode_latin1(text, options.latin1),
        TextEncoding::Utf16 | TextEncoding::Utf16BE => {
            let bytes = encoding::utf16_to_utf8(text, ByteOrder::BigEndian, options.surrogates);
            encoding::utf8_bytes_to_string(bytes)
        }
        TextEncoding::Utf8 => encoding::decode_utf8(text),
    }
}
