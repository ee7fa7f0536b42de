//! Nybble-level access to packed decimal bytes.
//!
//! Nybbles are numbered from the start of the encoded value, high nybble
//! first. A value of precision `p` occupies `p/2 + 1` bytes, i.e. `p + 1`
//! or `p + 2` nybbles; the last one is the sign, and an even precision
//! leaves a zero pad nybble in front.
//!
//! ```text
//! DECIMAL(7,2) -123.45     DECIMAL(6,0) +123456
//! 0 0 | 1 2 | 3 4 | 5 D    0 1 | 2 3 | 4 5 | 6 C
//! ```
//!
//! None of these helpers check the buffer length beyond Rust's own slice
//! indexing; callers guarantee `offset + len` bytes are present.

/// Sign nybble written for negative values.
pub const NEGATIVE_SIGN: u8 = 0x0D;
/// Sign nybble written for zero and positive values.
pub const POSITIVE_SIGN: u8 = 0x0C;

/// Digits combined per chunk on the wide decode paths.
pub const CHUNK_DIGITS: usize = 9;

/// True if the sign nybble of the value at `offset` marks it negative.
pub fn is_negative(buffer: &[u8], offset: usize, len: usize) -> bool {
    buffer[offset + len - 1] & 0x0F == NEGATIVE_SIGN
}

#[inline]
fn nybble_at(buffer: &[u8], offset: usize, index: usize) -> u8 {
    let byte = buffer[offset + index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

/// Accumulate `count` nybbles starting at nybble `start` into a `u32`.
///
/// Good for up to 9 digits without overflow. Malformed input wraps.
pub fn nybbles_to_u32(buffer: &[u8], offset: usize, start: usize, count: usize) -> u32 {
    (start..start + count).fold(0u32, |value, i| {
        value
            .wrapping_mul(10)
            .wrapping_add(u32::from(nybble_at(buffer, offset, i)))
    })
}

/// Accumulate `count` nybbles starting at nybble `start` into a `u64`.
///
/// Good for up to 19 digits without overflow. Malformed input wraps.
pub fn nybbles_to_u64(buffer: &[u8], offset: usize, start: usize, count: usize) -> u64 {
    (start..start + count).fold(0u64, |value, i| {
        value
            .wrapping_mul(10)
            .wrapping_add(u64::from(nybble_at(buffer, offset, i)))
    })
}

/// Split the digit nybbles of a `len`-byte value into 9-digit chunks.
///
/// Chunks are returned least significant first; the last one holds the
/// remaining high-order digits (including any pad nybble).
pub fn digit_chunks(buffer: &[u8], offset: usize, len: usize) -> Vec<u32> {
    let mut end = len * 2 - 1;
    let mut chunks = Vec::with_capacity(end.div_ceil(CHUNK_DIGITS));
    while end > 0 {
        let start = end.saturating_sub(CHUNK_DIGITS);
        chunks.push(nybbles_to_u32(buffer, offset, start, end - start));
        end = start;
    }
    chunks
}
