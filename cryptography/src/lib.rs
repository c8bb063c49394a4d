//! Hash data and commit to ordered or namespaced leaves.
//!
//! # Status
//!
//! `tessera-cryptography` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};
use thiserror::Error;

pub mod merkle;
pub mod nmt;
pub mod sha256;
pub use sha256::{hash, Sha256};

/// Errors that can occur when hashing or verifying proofs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid digest length")]
    InvalidDigestLength,
    #[error("invalid namespaced hash length: {0}")]
    InvalidNamespacedHashLength(usize),
    #[error("leaf too short to carry a namespace: {0}")]
    LeafTooShort(usize),
    #[error("leaves pushed out of namespace order")]
    UnorderedNamespace,
    #[error("invalid range: {start}..{end} of {leaves} leaves")]
    InvalidRange {
        start: usize,
        end: usize,
        leaves: usize,
    },
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),
    #[error("invalid proof")]
    InvalidProof,
}

/// A fixed-size output of a [Hasher].
pub trait Digest:
    AsRef<[u8]>
    + for<'a> TryFrom<&'a [u8], Error = Error>
    + Copy
    + Debug
    + Display
    + Eq
    + Ord
    + Hash
    + Send
    + Sync
    + 'static
{
    /// The length of the digest in bytes.
    const SIZE: usize;
}

/// Interface that tessera crates rely on for hashing.
///
/// Trees and commitments are generic over the [Hasher] so that the same layout rules can be
/// evaluated with another hash function (i.e. for a circuit-friendly verifier).
///
/// This trait is required to implement the `Clone` trait because it is often
/// part of a struct that is cloned. In practice, implementations do not actually
/// clone the hasher state but users should not rely on this behavior and call `reset`
/// after cloning.
pub trait Hasher: Clone + Send + Sync + 'static {
    /// Digest generated by the hasher.
    type Digest: Digest;

    /// Create a new hasher.
    fn new() -> Self;

    /// Append message to previously recorded data.
    fn update(&mut self, message: &[u8]);

    /// Hash all recorded data and reset the hasher
    /// to the initial state.
    fn finalize(&mut self) -> Self::Digest;

    /// Reset the hasher without generating a hash.
    ///
    /// This function does not need to be called after `finalize`.
    fn reset(&mut self);

    /// Return result of hashing nothing.
    fn empty() -> Self::Digest {
        Self::new().finalize()
    }
}
