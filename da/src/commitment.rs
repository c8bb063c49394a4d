use crate::{tree::row_tree, Error};
use std::collections::{btree_map::Entry, BTreeMap};
use tessera_coding::ExtendedDataSquare;
use tessera_cryptography::{merkle, sha256::Digest, Sha256};
use tessera_inclusion::calculate_commit_paths;

/// Read the commitment of a blob of `share_len` shares starting at `start` from the subtree roots
/// of the rows it occupies.
///
/// For a blob laid out by the non-interactive default rules this equals the commitment computed
/// from the blob alone.
pub fn commitment_from_square(
    eds: &ExtendedDataSquare,
    start: usize,
    share_len: usize,
) -> Result<Digest, Error> {
    let square_size = eds.original_width();
    let end = start + share_len;
    if share_len == 0 || end > square_size * square_size {
        return Err(Error::InvalidShareRange { start, end });
    }

    let paths = calculate_commit_paths(square_size, start, share_len);
    let mut trees = BTreeMap::new();
    let mut roots = Vec::with_capacity(paths.len());
    for path in paths {
        let tree = match trees.entry(path.row) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(row_tree(eds, path.row)?),
        };
        let root = tree.tree().range_root(path.leaf_range(square_size))?;
        roots.push(root.to_bytes());
    }
    Ok(merkle::root::<Sha256, _>(&roots))
}
