use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of the input.
///
/// This is the fixed one-way hash behind name-lookup comparison and
/// permission tokens. Both sides of a comparison must use the same digest:
/// the store computes it over the persisted column, callers compute it over
/// the probe value.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push(char::from_digit(u32::from(byte >> 4), 16).unwrap_or('0'));
        out.push(char::from_digit(u32::from(byte & 0x0f), 16).unwrap_or('0'));
    }
    out
}
