//! Locate the subtree roots of a blob in the row trees of a square.
//!
//! A node is identified by its height (leaves are at height 0) and its position among the nodes
//! of that height:
//!
//! ```text
//! height   position
//!   3          0
//!             / \
//!            /   \
//!   2       0     1
//!          / \   / \
//!   1     0   1 2   3
//!        /\  /\ /\  /\
//!   0   0 1 2 3 4 5 6 7
//! ```
//!
//! and reached from the root of a row (the tree over the original half of an extended row) by
//! walking left or right once per level.

use std::ops::Range;
use tessera_shares::{blob_min_square_size, next_aligned_index};
use tessera_utils::math::{is_power_of_two, log2};

use crate::commitment::merkle_mountain_range_sizes;

/// A step from a node to one of its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkInstruction {
    Left = 0,
    Right = 1,
}

/// A path from the root of `row` to a subtree root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    pub instructions: Vec<WalkInstruction>,
    pub row: usize,
}

impl Path {
    /// Leaves of the row (in a square of `square_size`) covered by the node at the end of the path.
    pub fn leaf_range(&self, square_size: usize) -> Range<usize> {
        let depth = self.instructions.len();
        let height = log2(square_size).unwrap_or(0).saturating_sub(depth);
        let position = self
            .instructions
            .iter()
            .fold(0usize, |position, step| (position << 1) | *step as usize);
        (position << height)..((position + 1) << height)
    }
}

/// A node identified by its height and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub height: usize,
    pub position: usize,
}

/// Walk from the root to the node at `position` of a level `depth` below it, most significant
/// bit first.
pub fn gen_subtree_root_path(depth: usize, position: usize) -> Vec<WalkInstruction> {
    (0..depth)
        .rev()
        .map(|bit| {
            if position & (1 << bit) == 0 {
                WalkInstruction::Left
            } else {
                WalkInstruction::Right
            }
        })
        .collect()
}

/// Coordinates of the subtree roots of `len` leaves starting at `start` within a row.
pub fn subtree_root_coordinates(min_square_size: usize, len: usize, start: usize) -> Vec<Coord> {
    let mut index = start;
    let mut coords = Vec::new();
    for size in merkle_mountain_range_sizes(len, min_square_size) {
        coords.push(Coord {
            height: size.trailing_zeros() as usize,
            position: index / size,
        });
        index += size;
    }
    coords
}

/// Paths to every subtree root of a blob of `blob_share_len` shares placed at (or aligned after)
/// `start` in a square of `square_size`.
///
/// Returns no paths for an empty blob or a square size that is not a power of two.
pub fn calculate_commit_paths(square_size: usize, start: usize, blob_share_len: usize) -> Vec<Path> {
    if blob_share_len == 0 || !is_power_of_two(square_size) {
        return Vec::new();
    }
    let (start, _) = next_aligned_index(start, blob_share_len, square_size);
    let min_square_size = blob_min_square_size(blob_share_len);
    let start_row = start / square_size;
    let end_row = (start + blob_share_len - 1) / square_size;
    let max_depth = square_size.trailing_zeros() as usize;

    let mut paths = Vec::new();
    for row in start_row..=end_row {
        let row_start = if row == start_row { start % square_size } else { 0 };
        let row_end = if row == end_row {
            start + blob_share_len - end_row * square_size
        } else {
            square_size
        };
        for coord in subtree_root_coordinates(min_square_size, row_end - row_start, row_start) {
            paths.push(Path {
                instructions: gen_subtree_root_path(max_depth - coord.height, coord.position),
                row,
            });
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use super::WalkInstruction::{Left as L, Right as R};

    #[test_case(2, 0, vec![L, L]; "depth 2 first")]
    #[test_case(0, 0, vec![]; "root")]
    #[test_case(3, 1, vec![L, L, R]; "depth 3 second")]
    #[test_case(3, 2, vec![L, R, L]; "depth 3 third")]
    #[test_case(5, 16, vec![R, L, L, L, L]; "depth 5 middle")]
    fn test_gen_subtree_root_path(depth: usize, position: usize, expected: Vec<WalkInstruction>) {
        assert_eq!(gen_subtree_root_path(depth, position), expected);
    }

    fn path(instructions: Vec<WalkInstruction>, row: usize) -> Path {
        Path { instructions, row }
    }

    #[test]
    fn test_calculate_commit_paths() {
        // Test case 0: single share
        assert_eq!(calculate_commit_paths(2, 0, 1), vec![path(vec![L], 0)]);

        // Test case 1: full row
        assert_eq!(calculate_commit_paths(2, 2, 2), vec![path(vec![], 1)]);

        // Test case 2: unaligned start moves to the next row
        assert_eq!(calculate_commit_paths(2, 1, 2), vec![path(vec![], 1)]);

        // Test case 3: half row
        assert_eq!(calculate_commit_paths(4, 2, 2), vec![path(vec![R], 0)]);

        // Test case 4: spans two rows
        assert_eq!(
            calculate_commit_paths(4, 2, 4),
            vec![path(vec![R], 0), path(vec![L], 1)]
        );

        // Test case 5: last row of a large square
        assert_eq!(
            calculate_commit_paths(64, 4032, 33),
            vec![
                path(vec![L, L, L], 63),
                path(vec![L, L, R], 63),
                path(vec![L, R, L], 63),
                path(vec![L, R, R], 63),
                path(vec![R, L, L, L, L, L], 63),
            ]
        );

        // Test case 6: degenerate input
        assert!(calculate_commit_paths(4, 0, 0).is_empty());
        assert!(calculate_commit_paths(3, 0, 1).is_empty());
    }

    #[test]
    fn test_subtree_root_coordinates() {
        assert_eq!(
            subtree_root_coordinates(4, 11, 0),
            vec![
                Coord { height: 2, position: 0 },
                Coord { height: 2, position: 1 },
                Coord { height: 1, position: 4 },
                Coord { height: 0, position: 10 },
            ]
        );
    }

    #[test]
    fn test_leaf_range() {
        assert_eq!(path(vec![], 0).leaf_range(4), 0..4);
        assert_eq!(path(vec![R], 0).leaf_range(4), 2..4);
        assert_eq!(path(vec![L, R], 0).leaf_range(4), 1..2);
        assert_eq!(path(vec![R, L, L, L, L, L], 0).leaf_range(64), 32..33);
        assert_eq!(path(vec![L, R, L], 0).leaf_range(64), 16..24);
    }

    #[test]
    fn test_paths_cover_blob() {
        // Paths partition the blob's shares
        for square_size in [1, 2, 4, 8, 16] {
            for len in 1..=square_size * square_size {
                for start in 0..square_size * square_size {
                    let (aligned, _) = next_aligned_index(start, len, square_size);
                    if aligned + len > square_size * square_size {
                        continue;
                    }
                    let mut covered = Vec::new();
                    for path in calculate_commit_paths(square_size, start, len) {
                        let range = path.leaf_range(square_size);
                        covered.extend(range.map(|i| path.row * square_size + i));
                    }
                    let expected: Vec<usize> = (aligned..aligned + len).collect();
                    assert_eq!(covered, expected, "size={square_size} start={start} len={len}");
                }
            }
        }
    }
}
