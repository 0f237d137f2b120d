//! Composite key codec.
//!
//! Records are addressed by an `(index, sub-key)` pair. The backing store
//! only sees a single flat key of the form
//!
//! ```text
//! <unsigned decimal index> '/' <raw sub-key bytes>
//! ```
//!
//! The index is written without padding, so the separator can never occur
//! inside it. The sub-key is copied verbatim and may itself contain `/`.

use crate::{Error, Result};

/// Byte separating the index from the sub-key.
pub const KEY_SEPARATOR: u8 = b'/';

/// Encodes an `(index, key)` pair into a composite backing-store key.
pub fn encode_key(index: u64, key: &[u8]) -> Vec<u8> {
    let digits = index.to_string();
    let mut out = Vec::with_capacity(digits.len() + 1 + key.len());
    out.extend_from_slice(digits.as_bytes());
    out.push(KEY_SEPARATOR);
    out.extend_from_slice(key);
    out
}

/// Splits a composite key into its index and sub-key.
///
/// The split happens at the first separator, which is always the one that
/// terminates the index.
pub fn split_key(composite: &[u8]) -> Result<(u64, &[u8])> {
    let pos = composite
        .iter()
        .position(|&b| b == KEY_SEPARATOR)
        .ok_or(Error::InvalidKeyFormat)?;
    let index = parse_index(&composite[..pos])?;
    Ok((index, &composite[pos + 1..]))
}

/// Extracts the index from a composite key.
///
/// # Errors
///
/// Returns [`Error::InvalidKeyFormat`] when no separator is present and
/// [`Error::IndexParse`] when the prefix is not an unsigned decimal integer.
pub fn extract_index(composite: &[u8]) -> Result<u64> {
    split_key(composite).map(|(index, _)| index)
}

/// Parses an unsigned decimal index.
///
/// Non-UTF-8 input is reported through the same parse error as any other
/// invalid digit.
pub fn parse_index(digits: &[u8]) -> Result<u64> {
    // `u64::from_str` accepts a leading '+', which is not part of the format
    if digits.first() == Some(&b'+') {
        // A lone sign yields the same `InvalidDigit` error as any bad digit
        return "+".parse::<u64>().map_err(Error::from);
    }
    Ok(String::from_utf8_lossy(digits).parse::<u64>()?)
}
