/// FNV-1a 64-bit offset basis, the default seed for [`hash_bytes`].
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `bytes`, starting from `seed`.
///
/// Only an inequality pre-filter: two lines count as equal when their hashes
/// match AND their bytes match, so a collision can never produce a false
/// equality.
pub fn hash_bytes(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = seed;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Split `text` into lines on LF, CRLF, or lone CR.
///
/// Terminators are not part of the emitted lines. Input ending in a
/// terminator yields a final empty line; empty input yields no lines.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut ix = 0usize;
    while ix < bytes.len() {
        match bytes[ix] {
            b'\r' => {
                lines.push(text[start..ix].to_string());
                ix += if bytes.get(ix + 1) == Some(&b'\n') { 2 } else { 1 };
                start = ix;
            }
            b'\n' => {
                lines.push(text[start..ix].to_string());
                ix += 1;
                start = ix;
            }
            _ => ix += 1,
        }
    }
    lines.push(text[start..].to_string());
    lines
}
