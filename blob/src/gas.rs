//! Gas charged for blob data and the largest blob a square can carry.

use tessera_shares::{
    consts::{CONTINUATION_SPARSE_SHARE_CONTENT_SIZE, SHARE_SIZE},
    sparse_shares_needed,
};

/// Default gas charged per byte of share occupied by a blob.
pub const DEFAULT_GAS_PER_BLOB_BYTE: u32 = 8;

/// Default maximum number of bytes of blob data in a block.
pub const DEFAULT_MAX_BYTES: usize = 64 * 64 * CONTINUATION_SPARSE_SHARE_CONTENT_SIZE;

/// Gas parameters for blobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasConfig {
    pub gas_per_blob_byte: u32,
    pub max_bytes: usize,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_per_blob_byte: DEFAULT_GAS_PER_BLOB_BYTE,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Gas charged for blobs of `blob_sizes` bytes: every share they occupy is charged in full.
pub fn gas_to_consume(blob_sizes: &[u32], gas_per_byte: u32) -> u64 {
    let shares: u64 = blob_sizes
        .iter()
        .map(|&size| sparse_shares_needed(size as usize) as u64)
        .sum();
    shares * SHARE_SIZE as u64 * u64::from(gas_per_byte)
}

/// Largest blob that fits in a square of `max_square_size` (next to at least one transaction
/// share) and in the block byte limit.
pub fn max_blob_size(config: &GasConfig, max_square_size: usize) -> usize {
    let shares = (max_square_size * max_square_size).saturating_sub(1);
    (shares * CONTINUATION_SPARSE_SHARE_CONTENT_SIZE).min(config.max_bytes)
}
