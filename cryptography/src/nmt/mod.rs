//! Namespaced Merkle tree (NMT).
//!
//! An NMT is a binary Merkle tree whose leaves are ordered by a fixed-size namespace prefix. Every
//! node carries the minimum and maximum namespace of the leaves beneath it, so a root (and any
//! inner node) commits not only to the data but also to the range of namespaces it covers:
//!
//! ```text
//!                        [ns0, ns2]
//!                      /            \
//!              [ns0, ns1]          [ns2, ns2]
//!              /        \          /        \
//!         [ns0,ns0] [ns1,ns1] [ns2,ns2] [ns2,ns2]
//! ```
//!
//! A node is serialized as `min || max || digest` where:
//!
//! * a leaf `ns || data` hashes to `ns || ns || H(0x00 || ns || data)`
//! * an inner node hashes to `l.min || max || H(0x01 || l || r)`
//!
//! The tree ignores the maximum namespace (`0xFF..FF`): when the right child starts at the maximum
//! namespace, the parent's range ends at the left child's maximum instead. This keeps parity data
//! (which is always pushed under the maximum namespace) from widening the range of the roots
//! that cover it.
//!
//! Leaves are split like an RFC-6962 tree (at the largest power of two less than the number of
//! leaves), which lets the root of any aligned power-of-two range of leaves be read directly as
//! an inner node of the tree.

use crate::{Digest, Error, Hasher};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};
use tessera_utils::{hex, math::split_point};

/// Prefix applied to leaves before hashing.
pub const LEAF_PREFIX: u8 = 0x00;

/// Prefix applied to inner nodes before hashing.
pub const NODE_PREFIX: u8 = 0x01;

/// A node of a namespaced Merkle tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NamespacedHash<const N: usize, D> {
    min: [u8; N],
    max: [u8; N],
    digest: D,
}

impl<const N: usize, D: Digest> NamespacedHash<N, D> {
    /// The length of a serialized node.
    pub const SIZE: usize = 2 * N + D::SIZE;

    pub fn new(min: [u8; N], max: [u8; N], digest: D) -> Self {
        Self { min, max, digest }
    }

    /// Root of a tree with no leaves.
    pub fn empty<H: Hasher<Digest = D>>() -> Self {
        Self::new([0; N], [0; N], H::empty())
    }

    pub fn min(&self) -> &[u8; N] {
        &self.min
    }

    pub fn max(&self) -> &[u8; N] {
        &self.max
    }

    pub fn digest(&self) -> &D {
        &self.digest
    }

    /// Returns true if `namespace` falls within the range covered by the node.
    pub fn contains(&self, namespace: &[u8; N]) -> bool {
        self.min <= *namespace && *namespace <= self.max
    }

    /// Serialize as `min || max || digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.min);
        bytes.extend_from_slice(&self.max);
        bytes.extend_from_slice(self.digest.as_ref());
        bytes
    }

    /// Deserialize from `min || max || digest`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidNamespacedHashLength(bytes.len()));
        }
        let min = <[u8; N]>::try_from(&bytes[..N])
            .map_err(|_| Error::InvalidNamespacedHashLength(bytes.len()))?;
        let max = <[u8; N]>::try_from(&bytes[N..2 * N])
            .map_err(|_| Error::InvalidNamespacedHashLength(bytes.len()))?;
        let digest = D::try_from(&bytes[2 * N..])?;
        Ok(Self { min, max, digest })
    }
}

impl<const N: usize, D: Digest> Display for NamespacedHash<N, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.to_bytes()))
    }
}

/// Hash a leaf whose first `N` bytes are its namespace.
pub fn hash_leaf<H: Hasher, const N: usize>(
    hasher: &mut H,
    leaf: &[u8],
) -> Result<NamespacedHash<N, H::Digest>, Error> {
    let namespace = leaf
        .get(..N)
        .and_then(|namespace| <[u8; N]>::try_from(namespace).ok())
        .ok_or(Error::LeafTooShort(leaf.len()))?;
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(leaf);
    Ok(NamespacedHash::new(namespace, namespace, hasher.finalize()))
}

/// Hash two siblings. Callers must ensure the siblings are ordered (see [is_ordered]).
pub fn hash_node<H: Hasher, const N: usize>(
    hasher: &mut H,
    left: &NamespacedHash<N, H::Digest>,
    right: &NamespacedHash<N, H::Digest>,
) -> NamespacedHash<N, H::Digest> {
    hasher.update(&[NODE_PREFIX]);
    for node in [left, right] {
        hasher.update(&node.min);
        hasher.update(&node.max);
        hasher.update(node.digest.as_ref());
    }
    let max = if right.min == [0xFF; N] {
        left.max
    } else {
        right.max
    };
    NamespacedHash::new(left.min, max, hasher.finalize())
}

/// Returns true if `right` may be the right sibling of `left`.
pub fn is_ordered<const N: usize, D>(
    left: &NamespacedHash<N, D>,
    right: &NamespacedHash<N, D>,
) -> bool {
    right.min >= left.max
}

fn compute_root<H: Hasher, const N: usize>(
    hasher: &mut H,
    leaves: &[NamespacedHash<N, H::Digest>],
) -> NamespacedHash<N, H::Digest> {
    match leaves.len() {
        0 => NamespacedHash::empty::<H>(),
        1 => leaves[0],
        n => {
            let k = split_point(n);
            let left = compute_root(hasher, &leaves[..k]);
            let right = compute_root(hasher, &leaves[k..]);
            hash_node(hasher, &left, &right)
        }
    }
}

/// A namespaced Merkle tree with `N`-byte namespaces.
#[derive(Clone, Debug)]
pub struct Tree<H: Hasher, const N: usize> {
    hasher: H,
    leaves: Vec<NamespacedHash<N, H::Digest>>,
}

impl<H: Hasher, const N: usize> Default for Tree<H, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hasher, const N: usize> Tree<H, N> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(leaves: usize) -> Self {
        Self {
            hasher: H::new(),
            leaves: Vec::with_capacity(leaves),
        }
    }

    /// Append a leaf (`namespace || data`).
    ///
    /// Leaves must be pushed in non-decreasing namespace order.
    pub fn push(&mut self, leaf: &[u8]) -> Result<(), Error> {
        let node = hash_leaf::<H, N>(&mut self.hasher, leaf)?;
        if let Some(last) = self.leaves.last() {
            if !is_ordered(last, &node) {
                return Err(Error::UnorderedNamespace);
            }
        }
        self.leaves.push(node);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Hashed leaves, in push order.
    pub fn leaves(&self) -> &[NamespacedHash<N, H::Digest>] {
        &self.leaves
    }

    /// Root of the tree.
    pub fn root(&self) -> NamespacedHash<N, H::Digest> {
        compute_root(&mut H::new(), &self.leaves)
    }

    /// Root over a contiguous range of leaves.
    ///
    /// If the range is aligned to its (power-of-two) length, the result is the inner node of the
    /// tree covering exactly those leaves.
    pub fn range_root(&self, range: Range<usize>) -> Result<NamespacedHash<N, H::Digest>, Error> {
        self.check_range(&range)?;
        Ok(compute_root(&mut H::new(), &self.leaves[range]))
    }

    /// Generate a proof that the leaves in `range` are included in the tree.
    pub fn prove(&self, range: Range<usize>) -> Result<Proof<N, H::Digest>, Error> {
        self.check_range(&range)?;
        let full = (split_point(self.leaves.len()) * 2).max(1);
        let mut nodes = Vec::new();
        self.collect_proof(&mut H::new(), 0, full, &range, true, &mut nodes);
        Ok(Proof {
            start: range.start,
            end: range.end,
            nodes,
        })
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), Error> {
        if range.start >= range.end || range.end > self.leaves.len() {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                leaves: self.leaves.len(),
            });
        }
        Ok(())
    }

    // Nodes are collected in the order a verifier consumes them: left to right, with every
    // subtree disjoint from the range contributing its root.
    fn collect_proof(
        &self,
        hasher: &mut H,
        lo: usize,
        hi: usize,
        range: &Range<usize>,
        include: bool,
        nodes: &mut Vec<NamespacedHash<N, H::Digest>>,
    ) -> Option<NamespacedHash<N, H::Digest>> {
        if lo >= self.leaves.len() {
            return None;
        }
        if hi - lo == 1 {
            let leaf = self.leaves[lo];
            if include && !range.contains(&lo) {
                nodes.push(leaf);
            }
            return Some(leaf);
        }
        let overlaps = lo < range.end && hi > range.start;
        let include_children = include && overlaps;
        let k = split_point(hi - lo);
        let left = self.collect_proof(hasher, lo, lo + k, range, include_children, nodes)?;
        let right = self.collect_proof(hasher, lo + k, hi, range, include_children, nodes);
        let node = match right {
            Some(right) => hash_node(hasher, &left, &right),
            None => left,
        };
        if include && !include_children {
            nodes.push(node);
        }
        Some(node)
    }
}

/// Proof that a contiguous range of leaves is included in a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<const N: usize, D> {
    start: usize,
    end: usize,
    nodes: Vec<NamespacedHash<N, D>>,
}

impl<const N: usize, D: Digest> Proof<N, D> {
    pub fn new(start: usize, end: usize, nodes: Vec<NamespacedHash<N, D>>) -> Self {
        Self { start, end, nodes }
    }

    /// First leaf index covered by the proof.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last leaf index covered by the proof.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Sibling nodes required to recompute the root.
    pub fn nodes(&self) -> &[NamespacedHash<N, D>] {
        &self.nodes
    }

    /// Verify that `leaves` (each pushed as `namespace || leaf`) occupy `start..end` in the tree
    /// with the given `root`.
    pub fn verify_inclusion<H: Hasher<Digest = D>, T: AsRef<[u8]>>(
        &self,
        root: &NamespacedHash<N, D>,
        namespace: &[u8; N],
        leaves: &[T],
    ) -> Result<(), Error> {
        if self.start >= self.end || leaves.len() != self.end - self.start {
            return Err(Error::InvalidProof);
        }

        // Hash provided leaves
        let mut hasher = H::new();
        let mut hashes = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let leaf = leaf.as_ref();
            let mut data = Vec::with_capacity(N + leaf.len());
            data.extend_from_slice(namespace);
            data.extend_from_slice(leaf);
            hashes.push(hash_leaf::<H, N>(&mut hasher, &data)?);
        }

        // Rebuild the smallest subtree containing the range, then fold in the remaining
        // (right-hand) siblings
        let mut verifier = Verifier {
            hasher,
            range: self.start..self.end,
            leaves: hashes.into_iter(),
            nodes: &self.nodes,
            cursor: 0,
        };
        let estimate = (split_point(self.end) * 2).max(1);
        let mut computed = verifier.compute(0, estimate)?.ok_or(Error::InvalidProof)?;
        for node in &self.nodes[verifier.cursor..] {
            if !is_ordered(&computed, node) {
                return Err(Error::InvalidProof);
            }
            computed = hash_node(&mut verifier.hasher, &computed, node);
        }
        if computed != *root {
            return Err(Error::InvalidProof);
        }
        Ok(())
    }
}

struct Verifier<'a, H: Hasher, const N: usize> {
    hasher: H,
    range: Range<usize>,
    leaves: std::vec::IntoIter<NamespacedHash<N, H::Digest>>,
    nodes: &'a [NamespacedHash<N, H::Digest>],
    cursor: usize,
}

impl<H: Hasher, const N: usize> Verifier<'_, H, N> {
    fn pop(&mut self) -> Option<NamespacedHash<N, H::Digest>> {
        let node = self.nodes.get(self.cursor).copied();
        if node.is_some() {
            self.cursor += 1;
        }
        node
    }

    fn compute(&mut self, lo: usize, hi: usize) -> Result<Option<NamespacedHash<N, H::Digest>>, Error> {
        if hi - lo == 1 {
            if self.range.contains(&lo) {
                return self.leaves.next().map(Some).ok_or(Error::InvalidProof);
            }
            return Ok(self.pop());
        }
        if hi <= self.range.start || lo >= self.range.end {
            return Ok(self.pop());
        }
        let k = split_point(hi - lo);
        let left = self.compute(lo, lo + k)?;
        let right = self.compute(lo + k, hi)?;
        match (left, right) {
            (Some(left), Some(right)) => {
                if !is_ordered(&left, &right) {
                    return Err(Error::InvalidProof);
                }
                Ok(Some(hash_node(&mut self.hasher, &left, &right)))
            }
            (Some(left), None) => Ok(Some(left)),
            (None, _) => Err(Error::InvalidProof),
        }
    }
}
