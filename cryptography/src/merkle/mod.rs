//! Binary Merkle tree over an ordered list of byte strings, hashed as described in
//! [RFC-6962](https://www.rfc-editor.org/rfc/rfc6962#section-2.1).
//!
//! Leaves and inner nodes are domain separated with a one byte prefix (`0x00` for leaves,
//! `0x01` for inner nodes) and a list of `n > 1` items is split at the largest power of two
//! strictly less than `n`. The root of an empty list is the hash of nothing.
//!
//! ```text
//!                 root
//!               /      \
//!              /        \
//!          node          leaf(e4)
//!         /    \
//!     node      node
//!     /  \      /  \
//!  l(e0) l(e1) l(e2) l(e3)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tessera_cryptography::{merkle::Builder, Sha256};
//!
//! let mut builder = Builder::<Sha256>::new(3);
//! builder.add(b"a");
//! builder.add(b"b");
//! builder.add(b"c");
//! let tree = builder.build();
//!
//! let proof = tree.proof(1).unwrap();
//! assert!(proof.verify::<Sha256>(&tree.root(), b"b").is_ok());
//! ```

use crate::{Error, Hasher};
use tessera_utils::math::split_point;

/// Prefix applied to leaves before hashing.
pub const LEAF_PREFIX: u8 = 0x00;

/// Prefix applied to inner nodes before hashing.
pub const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf.
pub fn hash_leaf<H: Hasher>(hasher: &mut H, leaf: &[u8]) -> H::Digest {
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize()
}

/// Hash an inner node.
pub fn hash_node<H: Hasher>(hasher: &mut H, left: &H::Digest, right: &H::Digest) -> H::Digest {
    hasher.update(&[NODE_PREFIX]);
    hasher.update(left.as_ref());
    hasher.update(right.as_ref());
    hasher.finalize()
}

/// Compute the root over a list of items without retaining the tree.
pub fn root<H: Hasher, T: AsRef<[u8]>>(items: &[T]) -> H::Digest {
    let mut builder = Builder::<H>::new(items.len());
    for item in items {
        builder.add(item.as_ref());
    }
    builder.build().root()
}

/// Accumulates leaves for a [Tree].
pub struct Builder<H: Hasher> {
    hasher: H,
    leaves: Vec<H::Digest>,
}

impl<H: Hasher> Builder<H> {
    /// Create a new builder with capacity for `n` leaves.
    pub fn new(n: usize) -> Self {
        Self {
            hasher: H::new(),
            leaves: Vec::with_capacity(n),
        }
    }

    /// Hash and append a leaf.
    pub fn add(&mut self, item: &[u8]) {
        let digest = hash_leaf(&mut self.hasher, item);
        self.leaves.push(digest);
    }

    /// Build the tree.
    pub fn build(self) -> Tree<H> {
        Tree {
            leaves: self.leaves,
            _hasher: std::marker::PhantomData,
        }
    }
}

/// An RFC-6962 Merkle tree over hashed leaves.
#[derive(Clone, Debug)]
pub struct Tree<H: Hasher> {
    leaves: Vec<H::Digest>,
    _hasher: std::marker::PhantomData<H>,
}

impl<H: Hasher> Tree<H> {
    /// Number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Root of the tree.
    pub fn root(&self) -> H::Digest {
        let mut hasher = H::new();
        subtree_root(&mut hasher, &self.leaves)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<Proof<H::Digest>, Error> {
        if index >= self.leaves.len() {
            return Err(Error::IndexOutOfBounds(index));
        }
        let mut hasher = H::new();
        let mut aunts = Vec::new();
        collect_aunts(&mut hasher, &self.leaves, index, &mut aunts);
        Ok(Proof {
            total: self.leaves.len(),
            index,
            leaf_hash: self.leaves[index],
            aunts,
        })
    }
}

fn subtree_root<H: Hasher>(hasher: &mut H, leaves: &[H::Digest]) -> H::Digest {
    match leaves.len() {
        0 => H::empty(),
        1 => leaves[0],
        n => {
            let k = split_point(n);
            let left = subtree_root(hasher, &leaves[..k]);
            let right = subtree_root(hasher, &leaves[k..]);
            hash_node(hasher, &left, &right)
        }
    }
}

// Aunts are pushed from the bottom of the tree up.
fn collect_aunts<H: Hasher>(
    hasher: &mut H,
    leaves: &[H::Digest],
    index: usize,
    aunts: &mut Vec<H::Digest>,
) {
    if leaves.len() <= 1 {
        return;
    }
    let k = split_point(leaves.len());
    if index < k {
        collect_aunts(hasher, &leaves[..k], index, aunts);
        aunts.push(subtree_root(hasher, &leaves[k..]));
    } else {
        collect_aunts(hasher, &leaves[k..], index - k, aunts);
        aunts.push(subtree_root(hasher, &leaves[..k]));
    }
}

/// Proof that a leaf is included at `index` in a tree of `total` leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<D> {
    pub total: usize,
    pub index: usize,
    pub leaf_hash: D,
    pub aunts: Vec<D>,
}

impl<D: crate::Digest> Proof<D> {
    /// Verify that `leaf` is included in the tree with the given `root`.
    pub fn verify<H: Hasher<Digest = D>>(&self, root: &D, leaf: &[u8]) -> Result<(), Error> {
        let mut hasher = H::new();
        if hash_leaf(&mut hasher, leaf) != self.leaf_hash {
            return Err(Error::InvalidProof);
        }
        let computed = compute_from_aunts(
            &mut hasher,
            self.index,
            self.total,
            self.leaf_hash,
            &self.aunts,
        )
        .ok_or(Error::InvalidProof)?;
        if computed != *root {
            return Err(Error::InvalidProof);
        }
        Ok(())
    }
}

fn compute_from_aunts<H: Hasher>(
    hasher: &mut H,
    index: usize,
    total: usize,
    leaf_hash: H::Digest,
    aunts: &[H::Digest],
) -> Option<H::Digest> {
    if index >= total {
        return None;
    }
    if total == 1 {
        return aunts.is_empty().then_some(leaf_hash);
    }
    let (last, rest) = aunts.split_last()?;
    let k = split_point(total);
    if index < k {
        let left = compute_from_aunts(hasher, index, k, leaf_hash, rest)?;
        Some(hash_node(hasher, &left, last))
    } else {
        let right = compute_from_aunts(hasher, index - k, total - k, leaf_hash, rest)?;
        Some(hash_node(hasher, last, &right))
    }
}
