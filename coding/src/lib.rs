//! Erasure code shares into an extended data square.
//!
//! # Status
//!
//! `tessera-coding` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use thiserror::Error;

mod eds;
pub use eds::ExtendedDataSquare;
mod reed_solomon;
pub use reed_solomon::ReedSolomon;

/// Errors that can occur when encoding or reconstructing shards.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid share count: {0}")]
    InvalidShareCount(usize),
    #[error("invalid shard size: {0}")]
    InvalidShardSize(usize),
    #[error("invalid axis length: {0}")]
    InvalidAxisLength(usize),
    #[error("not enough shards: have {have}, need {need}")]
    NotEnoughShards { have: usize, need: usize },
    #[error("shards are inconsistent with their encoding")]
    Inconsistent,
    #[error("square cannot be repaired")]
    Unrepairable,
    #[error("reed-solomon: {0}")]
    ReedSolomon(#[from] reed_solomon_simd::Error),
}

/// An erasure code that doubles an axis of equally sized shards.
pub trait Codec {
    /// Encode `k` original shards into `k` parity shards.
    fn encode(&self, data: &[&[u8]]) -> Result<Vec<Vec<u8>>, Error>;

    /// Fill in the missing shards of an axis of `2k` shards (originals followed by parity),
    /// given any `k` of them.
    fn reconstruct(&self, axis: &mut [Option<Vec<u8>>]) -> Result<(), Error>;
}
