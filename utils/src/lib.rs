//! Leverage common functionality across the share layout primitives.

use prost::{decode_length_delimiter, encoding::encode_varint, length_delimiter_len};

pub mod math;

/// Converts bytes to a hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Returns the number of bytes the varint length prefix of a `len` byte unit occupies.
pub fn delimiter_len(len: usize) -> usize {
    length_delimiter_len(len)
}

/// Prefixes `unit` with the varint encoding of its length.
///
/// This is how transactions are laid out back-to-back in compact shares: a reader can always
/// recover the unit boundaries by reading the prefix and skipping that many bytes.
pub fn length_delimit(unit: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(delimiter_len(unit.len()) + unit.len());
    encode_varint(unit.len() as u64, &mut result);
    result.extend_from_slice(unit);
    result
}

/// Splits a buffer of length-delimited units (as produced by [length_delimit]) back into units.
///
/// A zero length prefix terminates the buffer (everything after it is padding). Returns `None`
/// if a prefix is malformed or claims more bytes than remain.
pub fn split_delimited(mut buf: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut units = Vec::new();
    while !buf.is_empty() {
        let len = decode_length_delimiter(&mut buf).ok()?;
        if len == 0 {
            break;
        }
        let unit = buf.get(..len)?;
        units.push(unit.to_vec());
        buf = &buf[len..];
    }
    Some(units)
}
