use crate::{
    header::DataAvailabilityHeader,
    tree::{col_tree, row_tree},
    Error,
};
use tessera_coding::{ExtendedDataSquare, ReedSolomon};
use tessera_shares::Config;
use tracing::debug;

/// Erasure code the `square_size * square_size` shares of a square (row by row).
pub fn extend_shares(
    square_size: usize,
    shares: &[Vec<u8>],
    config: &Config,
) -> Result<ExtendedDataSquare, Error> {
    config.validate_square_size(square_size)?;
    let expected = square_size * square_size;
    if shares.len() != expected {
        return Err(Error::InvalidShareCount {
            expected,
            found: shares.len(),
        });
    }
    let eds = ExtendedDataSquare::compute(&ReedSolomon, shares)?;
    debug!(square_size, "extended shares");
    Ok(eds)
}

/// Rebuild an extended square from a subset of its cells (row by row, `None` where missing) and
/// check every row and column against `dah`.
pub fn repair(
    cells: Vec<Option<Vec<u8>>>,
    dah: &DataAvailabilityHeader,
) -> Result<ExtendedDataSquare, Error> {
    let width = dah.row_roots().len();
    let expected = width * width;
    if cells.len() != expected {
        return Err(Error::InvalidShareCount {
            expected,
            found: cells.len(),
        });
    }
    let missing = cells.iter().filter(|cell| cell.is_none()).count();
    let eds = ExtendedDataSquare::repair(&ReedSolomon, cells)?;

    for (row, root) in dah.row_roots().iter().enumerate() {
        if row_tree(&eds, row)?.root() != *root {
            return Err(Error::RowRootMismatch(row));
        }
    }
    for (column, root) in dah.column_roots().iter().enumerate() {
        if col_tree(&eds, column)?.root() != *root {
            return Err(Error::ColumnRootMismatch(column));
        }
    }
    debug!(width, missing, "repaired square");
    Ok(eds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::index::sample, SeedableRng};
    use tessera_shares::{build, Blob, Namespace};

    fn square(seed: u8) -> (usize, Vec<Vec<u8>>) {
        let namespace = Namespace::new_v0(&[seed; 10]).unwrap();
        let blob = Blob::new(namespace, vec![seed; 3_000], 0).unwrap();
        let (square, _) = build(vec![vec![seed; 200]], vec![blob], &Config::default()).unwrap();
        (square.size, square.to_bytes())
    }

    #[test]
    fn test_extend_shares() {
        let (size, shares) = square(1);
        let eds = extend_shares(size, &shares, &Config::default()).unwrap();
        assert_eq!(eds.original_width(), size);
        assert_eq!(eds.original_shares(), shares);
    }

    #[test]
    fn test_extend_shares_invalid() {
        let config = Config::default();
        let shares = vec![vec![0u8; 512]; 4];

        // Test case 1: wrong number of shares
        assert!(matches!(
            extend_shares(4, &shares, &config),
            Err(Error::InvalidShareCount {
                expected: 16,
                found: 4
            })
        ));

        // Test case 2: not a power of two
        assert!(matches!(
            extend_shares(3, &shares, &config),
            Err(Error::Shares(tessera_shares::Error::InvalidSquareSize(3)))
        ));

        // Test case 3: larger than the maximum
        assert!(matches!(
            extend_shares(256, &shares, &config),
            Err(Error::Shares(tessera_shares::Error::SquareSizeOutOfRange { size: 256, .. }))
        ));
    }

    #[test]
    fn test_repair() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
        let (size, shares) = square(2);
        let eds = extend_shares(size, &shares, &Config::default()).unwrap();
        let dah = DataAvailabilityHeader::new(&eds).unwrap();

        // Drop a quarter of the cells
        let mut rng = StdRng::seed_from_u64(0);
        let width = eds.width();
        let mut cells: Vec<Option<Vec<u8>>> = eds.flattened().iter().cloned().map(Some).collect();
        for index in sample(&mut rng, width * width, width * width / 4) {
            cells[index] = None;
        }
        let repaired = repair(cells.clone(), &dah).unwrap();
        assert_eq!(repaired, eds);

        // Header of another square
        let (other_size, other_shares) = square(3);
        assert_eq!(other_size, size);
        let other = extend_shares(other_size, &other_shares, &Config::default()).unwrap();
        let other_dah = DataAvailabilityHeader::new(&other).unwrap();
        assert!(matches!(
            repair(cells, &other_dah),
            Err(Error::RowRootMismatch(0))
        ));

        // Wrong number of cells
        assert!(matches!(
            repair(vec![None; 4], &dah),
            Err(Error::InvalidShareCount { .. })
        ));
    }
}
