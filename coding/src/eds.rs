//! Two-dimensional erasure coding of a square of shares.
//!
//! ```text
//!          k        k
//!     +--------+--------+
//!   k |   Q0   |   Q1   |   Q1: rows of Q0 extended
//!     +--------+--------+
//!   k |   Q2   |   Q3   |   Q2, Q3: columns of Q0 and Q1 extended
//!     +--------+--------+
//! ```
//!
//! Every row and every column of the extended square is a codeword, so any missing cell can be
//! rebuilt from half of the cells of its row or column.

use crate::{Codec, Error};
use tessera_utils::math::ceil_sqrt;
use tracing::debug;

/// A `2k x 2k` square whose top-left quadrant holds the original shares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedDataSquare {
    width: usize,
    cells: Vec<Vec<u8>>,
}

impl ExtendedDataSquare {
    /// Extend `k * k` equally sized shares (in row-major order) with `codec`.
    pub fn compute<C: Codec>(codec: &C, shares: &[Vec<u8>]) -> Result<Self, Error> {
        let k = original_width(shares.len())?;
        let width = 2 * k;
        let mut cells = vec![Vec::new(); width * width];
        for (index, share) in shares.iter().enumerate() {
            cells[(index / k) * width + index % k] = share.clone();
        }
        let mut eds = Self { width, cells };

        // Extend the rows of Q0 into Q1
        for row in 0..k {
            let parity = codec.encode(&eds.row(row)[..k])?;
            for (column, shard) in parity.into_iter().enumerate() {
                eds.cells[row * width + k + column] = shard;
            }
        }

        // Extend every column into Q2 and Q3
        for column in 0..width {
            let parity = codec.encode(&eds.col(column)[..k])?;
            for (row, shard) in parity.into_iter().enumerate() {
                eds.cells[(k + row) * width + column] = shard;
            }
        }
        debug!(width, "extended data square");
        Ok(eds)
    }

    /// Rebuild a square from a subset of its cells (row-major, `None` for missing cells).
    ///
    /// Rows and columns with enough cells are reconstructed until the square is complete. The
    /// result is checked to be the extension of its own original quadrant.
    pub fn repair<C: Codec>(codec: &C, cells: Vec<Option<Vec<u8>>>) -> Result<Self, Error> {
        let width = extended_width(cells.len())?;
        let mut cells = cells;
        loop {
            let missing = cells.iter().filter(|cell| cell.is_none()).count();
            if missing == 0 {
                break;
            }
            let mut progress = false;
            for row in 0..width {
                let range = row * width..(row + 1) * width;
                progress |= reconstruct_axis(codec, &mut cells, range.collect())?;
            }
            for column in 0..width {
                let indices = (0..width).map(|row| row * width + column).collect();
                progress |= reconstruct_axis(codec, &mut cells, indices)?;
            }
            if !progress {
                return Err(Error::Unrepairable);
            }
            debug!(width, missing, "repaired cells");
        }

        let cells: Vec<Vec<u8>> = cells.into_iter().flatten().collect();
        let repaired = Self { width, cells };
        let recomputed = Self::compute(codec, &repaired.original_shares())?;
        if recomputed != repaired {
            return Err(Error::Inconsistent);
        }
        Ok(repaired)
    }

    /// Width of the extended square.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width of the original square.
    pub fn original_width(&self) -> usize {
        self.width / 2
    }

    pub fn cell(&self, row: usize, column: usize) -> &[u8] {
        &self.cells[row * self.width + column]
    }

    pub fn row(&self, row: usize) -> Vec<&[u8]> {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(Vec::as_slice)
            .collect()
    }

    pub fn col(&self, column: usize) -> Vec<&[u8]> {
        (0..self.width)
            .map(|row| self.cell(row, column))
            .collect()
    }

    /// Shares of the original quadrant in row-major order.
    pub fn original_shares(&self) -> Vec<Vec<u8>> {
        let k = self.original_width();
        (0..k)
            .flat_map(|row| (0..k).map(move |column| (row, column)))
            .map(|(row, column)| self.cell(row, column).to_vec())
            .collect()
    }

    /// Every cell in row-major order.
    pub fn flattened(&self) -> &[Vec<u8>] {
        &self.cells
    }
}

fn original_width(shares: usize) -> Result<usize, Error> {
    let k = ceil_sqrt(shares);
    if k == 0 || k.checked_mul(k) != Some(shares) {
        return Err(Error::InvalidShareCount(shares));
    }
    Ok(k)
}

fn extended_width(cells: usize) -> Result<usize, Error> {
    let width = original_width(cells).map_err(|_| Error::InvalidShareCount(cells))?;
    if width % 2 != 0 {
        return Err(Error::InvalidShareCount(cells));
    }
    Ok(width)
}

// Returns whether any cell was filled in.
fn reconstruct_axis<C: Codec>(
    codec: &C,
    cells: &mut [Option<Vec<u8>>],
    indices: Vec<usize>,
) -> Result<bool, Error> {
    let present = indices.iter().filter(|&&i| cells[i].is_some()).count();
    if present == indices.len() || present < indices.len() / 2 {
        return Ok(false);
    }
    let mut axis: Vec<Option<Vec<u8>>> = indices.iter().map(|&i| cells[i].take()).collect();
    let result = codec.reconstruct(&mut axis);
    for (&i, shard) in indices.iter().zip(axis) {
        cells[i] = shard;
    }
    result?;
    Ok(true)
}
