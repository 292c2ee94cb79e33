// Integer decoding helpers for tag headers

/// Largest value a 4-byte syncsafe integer can hold (28 bits).
pub const SYNCSAFE_MAX: u32 = 0x0FFF_FFFF;

/// Decode a syncsafe 32-bit integer (7 bits per byte, big-endian).
///
/// The top bit of every byte is padding and is masked off rather than trusted.
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}

/// Encode the low 28 bits of `value` as a syncsafe integer.
pub fn encode_syncsafe(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Copy a fixed-width field out of a header buffer.
pub fn field<const N: usize>(buffer: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buffer[offset..offset + N]);
    out
}
