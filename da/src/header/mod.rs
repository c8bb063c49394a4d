//! Commit to an extended square with the roots of its rows and columns.
//!
//! ```text
//!                      data root
//!                    /           \
//!                  ...           ...
//!                /     \       /     \
//!              r0  ..  r(2k-1) c0 .. c(2k-1)
//! ```
//!
//! Each row root `r` and column root `c` is the root of an [ErasuredNamespacedMerkleTree] over
//! that axis of the extended square. The data root is the RFC-6962 root over the serialized row
//! roots followed by the serialized column roots.
//!
//! [ErasuredNamespacedMerkleTree]: crate::ErasuredNamespacedMerkleTree

use crate::{
    extend::extend_shares,
    tree::{col_tree, row_tree},
    Error,
};
use prost::Message;
use tessera_coding::ExtendedDataSquare;
use tessera_cryptography::{merkle, sha256::Digest, Sha256};
use tessera_inclusion::NamespacedHash;
use tessera_shares::{padding::tail_padding_share, Config};
use tracing::debug;

/// Protobuf encoding of a [DataAvailabilityHeader].
#[derive(Clone, PartialEq, Message)]
pub struct DataAvailabilityHeaderProto {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub row_roots: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub column_roots: Vec<Vec<u8>>,
}

/// Row and column roots of an extended square along with their data root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataAvailabilityHeader {
    row_roots: Vec<NamespacedHash>,
    column_roots: Vec<NamespacedHash>,
    hash: Digest,
}

impl Default for DataAvailabilityHeader {
    fn default() -> Self {
        Self::from_roots(Vec::new(), Vec::new())
    }
}

impl DataAvailabilityHeader {
    /// Compute the header of an extended square.
    pub fn new(eds: &ExtendedDataSquare) -> Result<Self, Error> {
        let width = eds.width();
        let mut row_roots = Vec::with_capacity(width);
        let mut column_roots = Vec::with_capacity(width);
        for i in 0..width {
            row_roots.push(row_tree(eds, i)?.root());
            column_roots.push(col_tree(eds, i)?.root());
        }
        let header = Self::from_roots(row_roots, column_roots);
        debug!(width, hash = %header.hash, "computed data availability header");
        Ok(header)
    }

    /// Assemble a header from its roots.
    pub fn from_roots(row_roots: Vec<NamespacedHash>, column_roots: Vec<NamespacedHash>) -> Self {
        let hash = compute_hash(&row_roots, &column_roots);
        Self {
            row_roots,
            column_roots,
            hash,
        }
    }

    pub fn row_roots(&self) -> &[NamespacedHash] {
        &self.row_roots
    }

    pub fn column_roots(&self) -> &[NamespacedHash] {
        &self.column_roots
    }

    /// Data root of the header.
    pub fn hash(&self) -> Digest {
        self.hash
    }

    /// Width of the original square.
    pub fn square_size(&self) -> usize {
        self.row_roots.len() / 2
    }

    /// Check the number of roots against `config` and the data root against the roots.
    pub fn validate_basic(&self, config: &Config) -> Result<(), Error> {
        let rows = self.row_roots.len();
        let columns = self.column_roots.len();
        let min = 2 * config.min_square_size;
        let max = 2 * config.max_square_size;
        if rows < min || columns < min {
            return Err(Error::TooFewRoots(min));
        }
        if rows > max || columns > max {
            return Err(Error::TooManyRoots(max));
        }
        if rows != columns {
            return Err(Error::UnequalRoots { rows, columns });
        }
        let expected = compute_hash(&self.row_roots, &self.column_roots);
        if self.hash != expected {
            return Err(Error::WrongHash {
                expected,
                found: self.hash,
            });
        }
        Ok(())
    }

    pub fn to_proto(&self) -> DataAvailabilityHeaderProto {
        DataAvailabilityHeaderProto {
            row_roots: self.row_roots.iter().map(NamespacedHash::to_bytes).collect(),
            column_roots: self.column_roots.iter().map(NamespacedHash::to_bytes).collect(),
        }
    }

    /// Rebuild a header (and its data root) from its protobuf encoding.
    pub fn from_proto(proto: &DataAvailabilityHeaderProto) -> Result<Self, Error> {
        let row_roots = proto
            .row_roots
            .iter()
            .map(|root| NamespacedHash::from_bytes(root))
            .collect::<Result<Vec<_>, _>>()?;
        let column_roots = proto
            .column_roots
            .iter()
            .map(|root| NamespacedHash::from_bytes(root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_roots(row_roots, column_roots))
    }

    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let proto = DataAvailabilityHeaderProto::decode(buf)?;
        Self::from_proto(&proto)
    }
}

fn compute_hash(row_roots: &[NamespacedHash], column_roots: &[NamespacedHash]) -> Digest {
    let roots: Vec<Vec<u8>> = row_roots
        .iter()
        .chain(column_roots)
        .map(NamespacedHash::to_bytes)
        .collect();
    merkle::root::<Sha256, _>(&roots)
}

/// Header of the smallest valid square: a single tail padding share.
pub fn min_data_availability_header() -> Result<DataAvailabilityHeader, Error> {
    let shares = vec![tail_padding_share().into_bytes()];
    let eds = extend_shares(1, &shares, &Config::default())?;
    DataAvailabilityHeader::new(&eds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_cryptography::{hash, Hasher};
    use tessera_shares::{build, split, Blob, BlockData, Namespace};
    use tessera_utils::hex;

    const MIN_DATA_ROOT: &str = "3d96b7d238e7e0456f6af8e7cdf0a67bd6cf9c2089ecb559c659dcaa1f880353";

    fn generate_shares(count: usize, byte: u8) -> Vec<Vec<u8>> {
        vec![vec![byte; 512]; count]
    }

    #[test]
    fn test_min_data_availability_header() {
        let dah = min_data_availability_header().unwrap();
        assert_eq!(dah.row_roots().len(), 2);
        assert_eq!(dah.column_roots().len(), 2);
        assert_eq!(dah.square_size(), 1);
        assert_eq!(hex(dah.hash().as_ref()), MIN_DATA_ROOT);

        // The only original share is tail padding and parity is ignored
        let tail = format!("{}fe", "ff".repeat(28));
        assert_eq!(
            hex(&dah.row_roots()[0].to_bytes()),
            format!("{tail}{tail}1b9958e4d30e60f7e8dd45ef903d06c87136545ab029cda50896a8885d547714")
        );
        assert!(dah.validate_basic(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_square() {
        let data = BlockData {
            square_size: 2,
            ..Default::default()
        };
        let shares: Vec<Vec<u8>> = split(&data)
            .unwrap()
            .into_iter()
            .map(|share| share.into_bytes())
            .collect();
        let eds = extend_shares(2, &shares, &Config::default()).unwrap();
        let dah = DataAvailabilityHeader::new(&eds).unwrap();
        assert_eq!(
            hex(dah.hash().as_ref()),
            "9af7c4a742bfa50c3898ba21327e2e2d8f97ac0397e9c9e74e0e3a29b2f68f44"
        );
    }

    #[test]
    fn test_generated_shares() {
        let eds = extend_shares(2, &generate_shares(4, 1), &Config::default()).unwrap();
        let dah = DataAvailabilityHeader::new(&eds).unwrap();
        assert_eq!(
            hex(dah.hash().as_ref()),
            "e1d0866fa1c1c2584e05b1b881c657b4d32c4dc9574cf9e266c1738b1c224717"
        );
    }

    #[test]
    fn test_default() {
        let dah = DataAvailabilityHeader::default();
        assert!(dah.row_roots().is_empty());
        assert_eq!(dah.hash(), Sha256::empty());
        assert!(matches!(
            dah.validate_basic(&Config::default()),
            Err(Error::TooFewRoots(2))
        ));
    }

    #[test]
    fn test_validate_basic() {
        let config = Config::default();
        let min = min_data_availability_header().unwrap();
        let root = min.row_roots()[0];

        // Test case 1: largest square
        let max = DataAvailabilityHeader::from_roots(vec![root; 256], vec![root; 256]);
        assert!(max.validate_basic(&config).is_ok());

        // Test case 2: too many roots
        let too_big = DataAvailabilityHeader::from_roots(vec![root; 257], vec![root; 257]);
        assert!(matches!(
            too_big.validate_basic(&config),
            Err(Error::TooManyRoots(256))
        ));

        // Test case 3: too few roots
        let too_small = DataAvailabilityHeader::from_roots(vec![root], vec![root]);
        let err = too_small.validate_basic(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("minimum valid DataAvailabilityHeader has at least"));

        // Test case 4: wrong hash
        let mut bad_hash = min.clone();
        bad_hash.hash = hash(&[1, 2, 3, 4]);
        let err = bad_hash.validate_basic(&config).unwrap_err();
        assert!(err.to_string().contains("wrong hash"));

        // Test case 5: unequal roots
        let mut columns = min.column_roots().to_vec();
        columns.push(root);
        let mismatched = DataAvailabilityHeader::from_roots(min.row_roots().to_vec(), columns);
        let err = mismatched.validate_basic(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("unequal number of row and column roots"));
        assert!(matches!(
            err,
            Error::UnequalRoots {
                rows: 2,
                columns: 3
            }
        ));

        // Test case 6: too many roots for a smaller maximum
        let small = Config {
            min_square_size: 1,
            max_square_size: 64,
        };
        let err = max.validate_basic(&small).unwrap_err();
        assert!(err
            .to_string()
            .contains("maximum valid DataAvailabilityHeader has at most"));
    }

    #[test]
    fn test_proto() {
        let namespace = Namespace::new_v0(&[7; 10]).unwrap();
        let blob = Blob::new(namespace, vec![7; 5_000], 0).unwrap();
        let (square, _) = build(vec![vec![1; 300]], vec![blob], &Config::default()).unwrap();
        let eds = extend_shares(square.size, &square.to_bytes(), &Config::default()).unwrap();
        let dah = DataAvailabilityHeader::new(&eds).unwrap();
        assert!(dah.validate_basic(&Config::default()).is_ok());

        let decoded = DataAvailabilityHeader::decode(&dah.encode()).unwrap();
        assert_eq!(decoded.hash(), dah.hash());
        assert_eq!(decoded, dah);

        let proto = DataAvailabilityHeader::default().to_proto();
        assert_eq!(
            DataAvailabilityHeader::from_proto(&proto).unwrap().hash(),
            Sha256::empty()
        );

        // Roots must be serialized namespaced hashes
        let invalid = DataAvailabilityHeaderProto {
            row_roots: vec![vec![1; 32]],
            column_roots: vec![vec![1; 32]],
        };
        assert!(matches!(
            DataAvailabilityHeader::from_proto(&invalid),
            Err(Error::Cryptography(
                tessera_cryptography::Error::InvalidNamespacedHashLength(32)
            ))
        ));
        assert!(matches!(
            DataAvailabilityHeader::decode(&[0xFF, 0xFF]),
            Err(Error::Decode(_))
        ));
    }
}
