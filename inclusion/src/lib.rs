//! Compute blob commitments and the subtree root paths that prove them.
//!
//! # Status
//!
//! `tessera-inclusion` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use tessera_cryptography::{nmt, sha256, Sha256};
use tessera_shares::consts::NAMESPACE_SIZE;
use thiserror::Error;

pub mod commitment;
pub mod paths;

pub use commitment::{create_commitment, create_commitments, merkle_mountain_range_sizes};
pub use paths::{calculate_commit_paths, gen_subtree_root_path, Coord, Path, WalkInstruction};

/// Node of a namespaced Merkle tree over shares.
pub type NamespacedHash = nmt::NamespacedHash<NAMESPACE_SIZE, sha256::Digest>;

/// Namespaced Merkle tree over shares.
pub type Nmt = nmt::Tree<Sha256, NAMESPACE_SIZE>;

/// Errors that can occur when computing commitments.
#[derive(Error, Debug)]
pub enum Error {
    #[error("shares: {0}")]
    Shares(#[from] tessera_shares::Error),
    #[error("cryptography: {0}")]
    Cryptography(#[from] tessera_cryptography::Error),
}
