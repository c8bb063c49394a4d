//! Namespaced Merkle tree over one row or column of an extended square.
//!
//! Shares of the original quadrant are pushed under their own namespace while every other share
//! (parity) is pushed under the parity namespace:
//!
//! ```text
//!           column
//!        0   1 | 2   3
//!      +---+---+---+---+
//!    0 | a | b | P | P |
//!      +---+---+---+---+
//!    1 | c | d | P | P |
//!  ----+---+---+---+---+
//!    2 | P | P | P | P |
//!      +---+---+---+---+
//!    3 | P | P | P | P |
//!      +---+---+---+---+
//! ```

use crate::Error;
use tessera_coding::ExtendedDataSquare;
use tessera_inclusion::{NamespacedHash, Nmt};
use tessera_shares::{consts::NAMESPACE_SIZE, namespace::PARITY_SHARES_NAMESPACE};

/// Namespaced Merkle tree over the `2 * square_size` shares of an axis of an extended square.
#[derive(Clone, Debug)]
pub struct ErasuredNamespacedMerkleTree {
    square_size: usize,
    axis_index: usize,
    cursor: usize,
    tree: Nmt,
}

impl ErasuredNamespacedMerkleTree {
    /// Create an empty tree for axis `axis_index` of a square with original width `square_size`.
    pub fn new(square_size: usize, axis_index: usize) -> Self {
        Self {
            square_size,
            axis_index,
            cursor: 0,
            tree: Nmt::with_capacity(2 * square_size),
        }
    }

    /// Push the next share of the axis.
    pub fn push(&mut self, share: &[u8]) -> Result<(), Error> {
        if self.cursor >= 2 * self.square_size {
            return Err(Error::AxisFull(self.cursor));
        }
        if share.len() < NAMESPACE_SIZE {
            return Err(Error::ShareTooShort(share.len()));
        }
        let parity = PARITY_SHARES_NAMESPACE;
        let namespace: &[u8] =
            if self.axis_index < self.square_size && self.cursor < self.square_size {
                &share[..NAMESPACE_SIZE]
            } else {
                parity.as_bytes()
            };
        let mut leaf = Vec::with_capacity(NAMESPACE_SIZE + share.len());
        leaf.extend_from_slice(namespace);
        leaf.extend_from_slice(share);
        self.tree.push(&leaf)?;
        self.cursor += 1;
        Ok(())
    }

    pub fn root(&self) -> NamespacedHash {
        self.tree.root()
    }

    /// The underlying tree (for range roots and proofs).
    pub fn tree(&self) -> &Nmt {
        &self.tree
    }
}

pub(crate) fn row_tree(
    eds: &ExtendedDataSquare,
    row: usize,
) -> Result<ErasuredNamespacedMerkleTree, Error> {
    let mut tree = ErasuredNamespacedMerkleTree::new(eds.original_width(), row);
    for share in eds.row(row) {
        tree.push(share)?;
    }
    Ok(tree)
}

pub(crate) fn col_tree(
    eds: &ExtendedDataSquare,
    column: usize,
) -> Result<ErasuredNamespacedMerkleTree, Error> {
    let mut tree = ErasuredNamespacedMerkleTree::new(eds.original_width(), column);
    for share in eds.col(column) {
        tree.push(share)?;
    }
    Ok(tree)
}
