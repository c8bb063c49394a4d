//! Lay out transactions and blobs in a square.
//!
//! A square of size `n` holds exactly `n * n` shares:
//!
//! ```text
//! | tx shares | tx padding | blob | ns padding | blob | ... | tail padding |
//! ```
//!
//! Blobs are placed following the non-interactive default rules: a blob of `k` shares starts
//! at a multiple of its minimum square size (`round_up_power_of_two(ceil_sqrt(k))`) and, where
//! it fits, in the row it would otherwise start in. This lets a blob's commitment be read from
//! the subtree roots of the square using only its position and length.

use crate::{
    blob::Blob,
    compact::CompactShareSplitter,
    consts::{DEFAULT_MAX_SQUARE_SIZE, DEFAULT_MIN_SQUARE_SIZE, SHARE_VERSION_ZERO},
    namespace::TX_NAMESPACE,
    padding::{namespace_padding_shares, tail_padding_shares},
    share::Share,
    sparse::{sparse_shares_needed, SparseShareSplitter},
    wire::extract_share_indexes,
    Error,
};
use tessera_utils::math::{ceil_sqrt, is_power_of_two, round_up_by, round_up_power_of_two};
use tracing::{debug, warn};

/// Bounds on the size of a square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub min_square_size: usize,
    pub max_square_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_square_size: DEFAULT_MIN_SQUARE_SIZE,
            max_square_size: DEFAULT_MAX_SQUARE_SIZE,
        }
    }
}

impl Config {
    /// Check that both bounds are powers of two and ordered.
    pub fn validate(&self) -> Result<(), Error> {
        if !is_power_of_two(self.min_square_size) {
            return Err(Error::InvalidConfig("min square size must be a power of two"));
        }
        if !is_power_of_two(self.max_square_size) {
            return Err(Error::InvalidConfig("max square size must be a power of two"));
        }
        if self.min_square_size > self.max_square_size {
            return Err(Error::InvalidConfig("min square size exceeds max square size"));
        }
        Ok(())
    }

    /// Check that `size` is a power of two within bounds.
    pub fn validate_square_size(&self, size: usize) -> Result<(), Error> {
        if !is_power_of_two(size) {
            return Err(Error::InvalidSquareSize(size));
        }
        if size < self.min_square_size || size > self.max_square_size {
            return Err(Error::SquareSizeOutOfRange {
                size,
                min: self.min_square_size,
                max: self.max_square_size,
            });
        }
        Ok(())
    }
}

/// Transactions and blobs of a block along with the size of its square.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockData {
    pub txs: Vec<Vec<u8>>,
    pub blobs: Vec<Blob>,
    pub square_size: usize,
}

/// A laid out square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Square {
    pub size: usize,
    pub shares: Vec<Share>,
}

impl Square {
    /// Raw bytes of every share, row by row.
    pub fn to_bytes(&self) -> Vec<Vec<u8>> {
        crate::share::to_bytes(&self.shares)
    }
}

/// Smallest square that can hold a blob of `share_count` shares.
pub fn blob_min_square_size(share_count: usize) -> usize {
    round_up_power_of_two(ceil_sqrt(share_count))
}

/// Next index at or after `cursor` where a blob of `blob_share_len` shares may start.
///
/// The second value is true if the blob fits in the row it starts in.
pub fn next_aligned_index(cursor: usize, blob_share_len: usize, square_size: usize) -> (usize, bool) {
    if cursor == 0 || square_size == 0 || cursor % square_size == 0 {
        return (cursor, true);
    }
    let min_square_size = blob_min_square_size(blob_share_len);
    let row_end = (cursor / square_size + 1) * square_size;
    let aligned = round_up_by(cursor, min_square_size);
    if aligned + blob_share_len <= row_end {
        return (aligned, true);
    }
    if aligned + min_square_size <= row_end {
        return (aligned, false);
    }
    (row_end, false)
}

/// Split transactions into compact shares in the transaction namespace.
pub fn split_txs<T: AsRef<[u8]>>(txs: &[T]) -> Result<Vec<Share>, Error> {
    let mut splitter = CompactShareSplitter::new(TX_NAMESPACE, SHARE_VERSION_ZERO)?;
    for tx in txs {
        splitter.write_tx(tx.as_ref());
    }
    Ok(splitter.export())
}

/// Split blobs into sparse shares, the first starting at `cursor`.
///
/// If `indexes` is non-empty, blob `i` starts at `indexes[i]`. Otherwise, every blob is aligned
/// to the non-interactive default rules for a square of `square_size`. Gaps are filled with
/// padding in the namespace of the preceding blob.
pub fn split_blobs(
    cursor: usize,
    indexes: &[usize],
    blobs: &[Blob],
    square_size: usize,
) -> Result<Vec<Share>, Error> {
    if !indexes.is_empty() && indexes.len() != blobs.len() {
        return Err(Error::IncorrectNumberOfIndexes {
            indexes: indexes.len(),
            blobs: blobs.len(),
        });
    }

    let mut splitter = SparseShareSplitter::new();
    for (i, blob) in blobs.iter().enumerate() {
        if i > 0 {
            let position = cursor + splitter.count();
            let start = match indexes.get(i) {
                Some(&index) => index,
                None => {
                    let len = sparse_shares_needed(blob.len());
                    next_aligned_index(position, len, square_size).0
                }
            };
            let Some(padding) = start.checked_sub(position) else {
                return Err(Error::UnexpectedBlobShareIndex {
                    index: start,
                    cursor: position,
                });
            };
            if padding > 0 {
                debug!(blob = i, start, padding, "padding before blob");
            }
            splitter.write_namespaced_padded_shares(padding)?;
        }
        splitter.write(blob)?;
    }
    Ok(splitter.export())
}

fn layout(
    txs: &[Vec<u8>],
    blobs: &[Blob],
    indexes: &[usize],
    square_size: usize,
) -> Result<Vec<Share>, Error> {
    if !is_power_of_two(square_size) {
        return Err(Error::InvalidSquareSize(square_size));
    }
    let capacity = square_size
        .checked_mul(square_size)
        .ok_or(Error::InvalidSquareSize(square_size))?;

    let tx_shares = split_txs(txs)?;
    let mut cursor = tx_shares.len();

    let mut padding = Vec::new();
    if let Some(first) = blobs.first() {
        let start = match indexes.first() {
            Some(&index) => index,
            None => next_aligned_index(cursor, sparse_shares_needed(first.len()), square_size).0,
        };
        if start < cursor {
            return Err(Error::UnexpectedFirstBlobShareIndex {
                index: start,
                cursor,
            });
        }
        padding = namespace_padding_shares(TX_NAMESPACE, SHARE_VERSION_ZERO, start - cursor)?;
    }
    cursor += padding.len();
    if let Some(&index) = indexes.first() {
        if index < cursor {
            return Err(Error::UnexpectedFirstBlobShareIndex { index, cursor });
        }
    }

    let blob_shares = split_blobs(cursor, indexes, blobs, square_size)?;
    cursor += blob_shares.len();
    if cursor > capacity {
        return Err(Error::SquareOverflow {
            shares: cursor,
            capacity,
        });
    }
    let tail = tail_padding_shares(capacity - cursor);
    debug!(
        square_size,
        txs = tx_shares.len(),
        padding = padding.len(),
        blobs = blob_shares.len(),
        tail = tail.len(),
        "laid out square"
    );

    let mut shares = Vec::with_capacity(capacity);
    shares.extend(tx_shares);
    shares.extend(padding);
    shares.extend(blob_shares);
    shares.extend(tail);
    Ok(shares)
}

/// Lay out block data in a square of `data.square_size`.
///
/// Blob start indexes are taken from index wrapped transactions when present. Blocks without
/// them align every blob by the non-interactive default rules.
pub fn split(data: &BlockData) -> Result<Vec<Share>, Error> {
    let mut indexes: Vec<usize> = extract_share_indexes(&data.txs)
        .into_iter()
        .map(|index| index as usize)
        .collect();
    indexes.sort_unstable();
    if indexes.is_empty() && !data.blobs.is_empty() {
        warn!(
            blobs = data.blobs.len(),
            "no share indexes found, using default alignment"
        );
    }
    layout(&data.txs, &data.blobs, &indexes, data.square_size)
}

/// Lay out transactions and blobs in the smallest square allowed by `config`.
///
/// Blobs are ordered by namespace (keeping submission order within a namespace).
pub fn build(txs: Vec<Vec<u8>>, mut blobs: Vec<Blob>, config: &Config) -> Result<(Square, BlockData), Error> {
    config.validate()?;
    blobs.sort_by_key(|blob| blob.namespace());

    // No square smaller than the shares written can fit them
    let tx_len = txs
        .iter()
        .map(|tx| tessera_utils::delimiter_len(tx.len()) + tx.len())
        .sum();
    let written = crate::compact::compact_shares_needed(tx_len)
        + blobs
            .iter()
            .map(|blob| sparse_shares_needed(blob.len()))
            .sum::<usize>();
    let mut size = blob_min_square_size(written).max(config.min_square_size);
    while size <= config.max_square_size {
        match layout(&txs, &blobs, &[], size) {
            Ok(shares) => {
                debug!(size, blobs = blobs.len(), "built square");
                let square = Square { size, shares };
                let data = BlockData {
                    txs,
                    blobs,
                    square_size: size,
                };
                return Ok((square, data));
            }
            Err(Error::SquareOverflow { .. }) => size *= 2,
            Err(err) => return Err(err),
        }
    }
    warn!(
        max_square_size = config.max_square_size,
        shares = written,
        "block does not fit in max square"
    );
    Err(Error::SquareOverflow {
        shares: written,
        capacity: config.max_square_size * config.max_square_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        namespace::Namespace,
        parse::merge,
        share::to_bytes,
        wire::marshal_index_wrapper,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use test_case::test_case;

    fn blob(sub_id: u8, len: usize) -> Blob {
        let namespace = Namespace::new_v0(&[sub_id; 10]).unwrap();
        Blob::new(namespace, vec![sub_id; len], 0).unwrap()
    }

    #[test_case(0, 5, 4, (0, true); "zero cursor")]
    #[test_case(4, 5, 4, (4, true); "row boundary")]
    #[test_case(1, 1, 4, (1, true); "single share")]
    #[test_case(1, 4, 4, (2, false); "aligned but spills")]
    #[test_case(3, 4, 4, (4, false); "next row")]
    #[test_case(3, 2, 8, (4, true); "aligned in row")]
    #[test_case(5, 9, 8, (8, false); "large blob next row")]
    fn test_next_aligned_index(cursor: usize, len: usize, size: usize, expected: (usize, bool)) {
        assert_eq!(next_aligned_index(cursor, len, size), expected);
    }

    #[test]
    fn test_blob_min_square_size() {
        let cases = [(0, 1), (1, 1), (2, 2), (4, 2), (5, 4), (16, 4), (17, 8), (21, 8), (65, 16)];
        for (shares, expected) in cases {
            assert_eq!(blob_min_square_size(shares), expected, "{shares}");
        }
    }

    #[test]
    fn test_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_square_size(1).is_ok());
        assert!(config.validate_square_size(128).is_ok());
        assert!(matches!(
            config.validate_square_size(0),
            Err(Error::InvalidSquareSize(0))
        ));
        assert!(matches!(
            config.validate_square_size(3),
            Err(Error::InvalidSquareSize(3))
        ));
        assert!(matches!(
            config.validate_square_size(256),
            Err(Error::SquareSizeOutOfRange { size: 256, .. })
        ));

        // Invalid bounds
        let config = Config {
            min_square_size: 8,
            max_square_size: 4,
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let config = Config {
            min_square_size: 3,
            max_square_size: 4,
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_split_empty() {
        let mut size = 1;
        while size <= DEFAULT_MAX_SQUARE_SIZE {
            let data = BlockData {
                square_size: size,
                ..Default::default()
            };
            let shares = split(&data).unwrap();
            assert_eq!(shares.len(), size * size);
            assert!(shares.iter().all(|share| share.namespace().is_tail_padding()));
            size *= 2;
        }

        for size in [0, 3, 6, 100] {
            let data = BlockData {
                square_size: size,
                ..Default::default()
            };
            assert!(matches!(split(&data), Err(Error::InvalidSquareSize(_))));
        }
    }

    #[test]
    fn test_split_default_alignment() {
        let data = BlockData {
            txs: vec![vec![1; 10]],
            blobs: vec![blob(1, 10), blob(2, 2400)],
            square_size: 4,
        };
        let shares = split(&data).unwrap();
        assert_eq!(shares.len(), 16);
        assert!(shares[0].namespace().is_tx());
        assert_eq!(shares[1].namespace(), data.blobs[0].namespace());

        // Second blob (5 shares) is aligned to index 4
        for share in &shares[2..4] {
            assert!(share.is_namespace_padding());
            assert_eq!(share.namespace(), data.blobs[0].namespace());
        }
        assert!(shares[4].is_sequence_start());
        assert_eq!(shares[4].namespace(), data.blobs[1].namespace());
        assert!(shares[9..].iter().all(|share| share.namespace().is_tail_padding()));

        let merged = merge(&to_bytes(&shares), 4).unwrap();
        assert_eq!(merged, data);
    }

    #[test]
    fn test_split_tx_padding() {
        // Two tx shares push a 5 share blob to the next aligned index
        let data = BlockData {
            txs: vec![vec![1; 600]],
            blobs: vec![blob(1, 2400)],
            square_size: 4,
        };
        let shares = split(&data).unwrap();
        assert!(shares[1].namespace().is_tx());
        assert!(!shares[1].is_padding());
        assert!(shares[2].namespace().is_tx());
        assert!(shares[2].is_padding());
        assert!(shares[3].namespace().is_tx());
        assert!(shares[4].is_sequence_start());
        assert_eq!(shares[4].namespace(), data.blobs[0].namespace());
        assert_eq!(merge(&to_bytes(&shares), 4).unwrap(), data);
    }

    #[test]
    fn test_split_with_indexes() {
        let data = BlockData {
            txs: vec![marshal_index_wrapper(b"pfb", &[8, 4])],
            blobs: vec![blob(1, 10), blob(2, 10)],
            square_size: 4,
        };
        let shares = split(&data).unwrap();
        assert_eq!(shares.len(), 16);
        for share in &shares[1..4] {
            assert!(share.namespace().is_tx());
            assert!(share.is_padding());
        }
        assert_eq!(shares[4].namespace(), data.blobs[0].namespace());
        for share in &shares[5..8] {
            assert!(share.is_namespace_padding());
            assert_eq!(share.namespace(), data.blobs[0].namespace());
        }
        assert_eq!(shares[8].namespace(), data.blobs[1].namespace());
        assert!(shares[9..].iter().all(|share| share.namespace().is_tail_padding()));
    }

    #[test]
    fn test_split_index_errors() {
        // Test case 0: first index inside the tx shares
        let data = BlockData {
            txs: vec![marshal_index_wrapper(&[1; 600], &[1, 3])],
            blobs: vec![blob(1, 10), blob(2, 10)],
            square_size: 4,
        };
        assert!(matches!(
            split(&data),
            Err(Error::UnexpectedFirstBlobShareIndex {
                index: 1,
                cursor: 2
            })
        ));

        // Test case 1: fewer indexes than blobs
        let data = BlockData {
            txs: vec![marshal_index_wrapper(b"pfb", &[4])],
            blobs: vec![blob(1, 10), blob(2, 10)],
            square_size: 4,
        };
        assert!(matches!(
            split(&data),
            Err(Error::IncorrectNumberOfIndexes {
                indexes: 1,
                blobs: 2
            })
        ));

        // Test case 2: overlapping blobs
        let data = BlockData {
            txs: vec![marshal_index_wrapper(b"pfb", &[4, 4])],
            blobs: vec![blob(1, 10), blob(2, 10)],
            square_size: 4,
        };
        assert!(matches!(
            split(&data),
            Err(Error::UnexpectedBlobShareIndex {
                index: 4,
                cursor: 5
            })
        ));

        // Test case 3: legacy indexes fall back to default alignment
        let data = BlockData {
            txs: vec![marshal_index_wrapper(b"pfb", &[0, 8])],
            blobs: vec![blob(1, 10), blob(2, 10)],
            square_size: 4,
        };
        let shares = split(&data).unwrap();
        assert_eq!(shares[1].namespace(), data.blobs[0].namespace());
        assert_eq!(shares[2].namespace(), data.blobs[1].namespace());
    }

    #[test]
    fn test_split_overflow() {
        let data = BlockData {
            txs: vec![vec![1; 10]],
            blobs: vec![blob(1, 10)],
            square_size: 1,
        };
        assert!(matches!(
            split(&data),
            Err(Error::SquareOverflow {
                shares: 2,
                capacity: 1
            })
        ));
    }

    #[test]
    fn test_build() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
        let config = Config::default();

        // Test case 0: empty block uses the minimum size
        let (square, data) = build(Vec::new(), Vec::new(), &config).unwrap();
        assert_eq!(square.size, 1);
        assert_eq!(square.shares.len(), 1);
        assert_eq!(data.square_size, 1);

        // Test case 1: blobs are sorted by namespace, stable within a namespace
        let first = Blob::new(Namespace::new_v0(&[3; 10]).unwrap(), vec![1], 0).unwrap();
        let second = Blob::new(Namespace::new_v0(&[3; 10]).unwrap(), vec![2], 0).unwrap();
        let blobs = vec![first.clone(), blob(9, 100), second.clone(), blob(1, 2000)];
        let (square, data) = build(vec![vec![7; 100]], blobs, &config).unwrap();
        assert_eq!(square.size, 4);
        assert_eq!(data.blobs[0].namespace(), Namespace::new_v0(&[1; 10]).unwrap());
        assert_eq!(data.blobs[1], first);
        assert_eq!(data.blobs[2], second);
        assert_eq!(split(&data).unwrap(), square.shares);
        assert_eq!(merge(&square.to_bytes(), square.size).unwrap(), data);

        // Test case 2: does not fit
        let config = Config {
            min_square_size: 1,
            max_square_size: 2,
        };
        assert!(matches!(
            build(Vec::new(), vec![blob(1, 2000)], &config),
            Err(Error::SquareOverflow { .. })
        ));
    }

    #[test]
    fn test_random_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = Config::default();
        for _ in 0..20 {
            let txs: Vec<Vec<u8>> = (0..rng.gen_range(0..10))
                .map(|_| {
                    let len = rng.gen_range(1..600);
                    (0..len).map(|_| rng.gen()).collect()
                })
                .collect();
            let blobs: Vec<Blob> = (0..rng.gen_range(0..10))
                .map(|_| {
                    let namespace = crate::namespace::random_blob_namespace(&mut rng);
                    let len = rng.gen_range(1..5000);
                    let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
                    Blob::new(namespace, data, 0).unwrap()
                })
                .collect();
            let (square, data) = build(txs.clone(), blobs, &config).unwrap();
            assert_eq!(square.shares.len(), square.size * square.size);
            assert_eq!(data.txs, txs);
            let merged = merge(&square.to_bytes(), square.size).unwrap();
            assert_eq!(merged, data);
        }
    }
}
