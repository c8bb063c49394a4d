//! Commit to a blob with the roots of its subtrees.
//!
//! The shares of a blob are grouped into a merkle mountain range of trees no larger than the
//! blob's minimum square size. Each group becomes a namespaced Merkle tree and the commitment
//! is the RFC-6962 root over the serialized tree roots:
//!
//! ```text
//!                     commitment
//!                    /          \
//!                 node          nmt(4..5)
//!                /    \
//!        nmt(0..2)    nmt(2..4)
//!         /    \       /    \
//!       s0     s1    s2     s3     s4
//! ```

use crate::{Error, Nmt};
use tessera_cryptography::{merkle, sha256::Digest, Sha256};
use tessera_shares::{blob_min_square_size, Blob, SparseShareSplitter};
use tessera_utils::math::round_down_power_of_two;

/// Decompose `total` leaves into trees of at most `max_tree_size` leaves.
///
/// Trees of `max_tree_size` are taken while they fit and the remainder is split into decreasing
/// powers of two.
pub fn merkle_mountain_range_sizes(mut total: usize, max_tree_size: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    while total > 0 {
        let size = if max_tree_size > 0 && total >= max_tree_size {
            max_tree_size
        } else {
            match round_down_power_of_two(total) {
                Some(size) => size,
                None => break,
            }
        };
        sizes.push(size);
        total -= size;
    }
    sizes
}

/// Commitment over the shares of `blob`.
pub fn create_commitment(blob: &Blob) -> Result<Digest, Error> {
    let mut splitter = SparseShareSplitter::new();
    splitter.write(blob)?;
    let shares = splitter.export();

    let namespace = blob.namespace();
    let sizes = merkle_mountain_range_sizes(shares.len(), blob_min_square_size(shares.len()));
    let mut roots = Vec::with_capacity(sizes.len());
    let mut cursor = 0;
    for size in sizes {
        let mut tree = Nmt::with_capacity(size);
        for share in &shares[cursor..cursor + size] {
            let mut leaf = Vec::with_capacity(namespace.as_bytes().len() + share.as_bytes().len());
            leaf.extend_from_slice(namespace.as_bytes());
            leaf.extend_from_slice(share.as_bytes());
            tree.push(&leaf)?;
        }
        roots.push(tree.root().to_bytes());
        cursor += size;
    }
    Ok(merkle::root::<Sha256, _>(&roots))
}

/// Commitments over the shares of each blob.
pub fn create_commitments(blobs: &[Blob]) -> Result<Vec<Digest>, Error> {
    blobs.iter().map(create_commitment).collect()
}
