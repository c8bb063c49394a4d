//! Prove that a range of original shares is committed to by a data root.
//!
//! A [ShareProof] is two layers of proofs:
//!
//! ```text
//!                 data root
//!                /         \
//!      (RowProof: row root -> data root)
//!              /             \
//!          row root  ...  row root
//!             |               |
//!   (NMT proof: shares -> row root, one per row)
//!             |               |
//!        [s s s s]  ...   [s s]
//! ```

use crate::{header::DataAvailabilityHeader, tree::row_tree, Error};
use std::ops::Range;
use tessera_coding::ExtendedDataSquare;
use tessera_cryptography::{merkle, nmt, sha256::Digest, Sha256};
use tessera_inclusion::NamespacedHash;
use tessera_shares::{consts::NAMESPACE_SIZE, Namespace};

/// Proof that a range of leaves is included in a row root.
pub type NmtProof = nmt::Proof<NAMESPACE_SIZE, Digest>;

/// Proof that the roots of rows `start_row..=end_row` are included in a data root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowProof {
    pub row_roots: Vec<NamespacedHash>,
    pub proofs: Vec<merkle::Proof<Digest>>,
    pub start_row: usize,
    pub end_row: usize,
}

impl RowProof {
    pub fn new(
        dah: &DataAvailabilityHeader,
        start_row: usize,
        end_row: usize,
    ) -> Result<Self, Error> {
        if start_row > end_row || end_row >= dah.row_roots().len() {
            return Err(Error::InvalidRowRange {
                start: start_row,
                end: end_row,
            });
        }
        let roots = dah.row_roots().len() + dah.column_roots().len();
        let mut builder = merkle::Builder::<Sha256>::new(roots);
        for root in dah.row_roots().iter().chain(dah.column_roots()) {
            builder.add(&root.to_bytes());
        }
        let tree = builder.build();
        let proofs = (start_row..=end_row)
            .map(|row| tree.proof(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            row_roots: dah.row_roots()[start_row..=end_row].to_vec(),
            proofs,
            start_row,
            end_row,
        })
    }

    /// Verify every row root against `root`.
    pub fn validate(&self, root: &Digest) -> Result<(), Error> {
        if self.start_row > self.end_row {
            return Err(Error::InvalidProof);
        }
        let rows = self.end_row - self.start_row + 1;
        if self.row_roots.len() != rows || self.proofs.len() != rows {
            return Err(Error::InvalidProof);
        }
        for (i, (row_root, proof)) in self.row_roots.iter().zip(&self.proofs).enumerate() {
            if proof.index != self.start_row + i {
                return Err(Error::InvalidProof);
            }
            proof.verify::<Sha256>(root, &row_root.to_bytes())?;
        }
        Ok(())
    }
}

/// Proof that a range of shares of one namespace is included in a data root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareProof {
    pub data: Vec<Vec<u8>>,
    pub namespace: Namespace,
    pub share_proofs: Vec<NmtProof>,
    pub row_proof: RowProof,
}

impl ShareProof {
    /// Prove the original shares at `range` (row-major indexes into the original square).
    pub fn new(
        eds: &ExtendedDataSquare,
        dah: &DataAvailabilityHeader,
        range: Range<usize>,
    ) -> Result<Self, Error> {
        let k = eds.original_width();
        if range.start >= range.end || range.end > k * k {
            return Err(Error::InvalidShareRange {
                start: range.start,
                end: range.end,
            });
        }
        let data: Vec<Vec<u8>> = range
            .clone()
            .map(|index| eds.cell(index / k, index % k).to_vec())
            .collect();

        // Every share must be in the namespace of the first
        let first = data[0]
            .get(..NAMESPACE_SIZE)
            .ok_or(Error::ShareTooShort(data[0].len()))?;
        let namespace = Namespace::from_bytes(first).map_err(tessera_shares::Error::from)?;
        if data
            .iter()
            .any(|share| share.get(..NAMESPACE_SIZE) != Some(&namespace.as_bytes()[..]))
        {
            return Err(Error::MixedNamespaces);
        }

        let start_row = range.start / k;
        let end_row = (range.end - 1) / k;
        let mut share_proofs = Vec::with_capacity(end_row - start_row + 1);
        for row in start_row..=end_row {
            let start = if row == start_row { range.start % k } else { 0 };
            let end = if row == end_row {
                (range.end - 1) % k + 1
            } else {
                k
            };
            share_proofs.push(row_tree(eds, row)?.tree().prove(start..end)?);
        }
        Ok(Self {
            data,
            namespace,
            share_proofs,
            row_proof: RowProof::new(dah, start_row, end_row)?,
        })
    }

    /// Verify the shares against their row roots and the row roots against `data_root`.
    pub fn validate(&self, data_root: &Digest) -> Result<(), Error> {
        self.row_proof.validate(data_root)?;
        if self.share_proofs.len() != self.row_proof.row_roots.len() {
            return Err(Error::InvalidProof);
        }
        let mut cursor = 0;
        for (proof, root) in self.share_proofs.iter().zip(&self.row_proof.row_roots) {
            let len = proof
                .end()
                .checked_sub(proof.start())
                .ok_or(Error::InvalidProof)?;
            let leaves = self
                .data
                .get(cursor..cursor + len)
                .ok_or(Error::InvalidProof)?;
            proof.verify_inclusion::<Sha256, _>(root, self.namespace.as_bytes(), leaves)?;
            cursor += len;
        }
        if cursor != self.data.len() {
            return Err(Error::InvalidProof);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extend_shares;
    use tessera_cryptography::hash;
    use tessera_shares::{build, sparse_shares_needed, Blob, Config, Square};

    fn setup() -> (Square, Vec<Blob>, ExtendedDataSquare, DataAvailabilityHeader) {
        let blobs = vec![
            Blob::new(Namespace::new_v0(&[1; 10]).unwrap(), vec![1; 2_000], 0).unwrap(),
            Blob::new(Namespace::new_v0(&[2; 10]).unwrap(), vec![2; 6_000], 0).unwrap(),
        ];
        let txs = vec![vec![3; 700], vec![4; 90]];
        let config = Config::default();
        let (square, data) = build(txs, blobs, &config).unwrap();
        let eds = extend_shares(square.size, &square.to_bytes(), &config).unwrap();
        let dah = DataAvailabilityHeader::new(&eds).unwrap();
        (square, data.blobs, eds, dah)
    }

    #[test]
    fn test_share_proof_blobs() {
        let (square, blobs, eds, dah) = setup();
        for blob in &blobs {
            let start = square
                .shares
                .iter()
                .position(|share| share.namespace() == blob.namespace())
                .unwrap();
            let range = start..start + sparse_shares_needed(blob.len());
            let proof = ShareProof::new(&eds, &dah, range.clone()).unwrap();
            assert_eq!(proof.namespace, blob.namespace());
            assert_eq!(proof.data, square.to_bytes()[range].to_vec());
            assert!(proof.validate(&dah.hash()).is_ok());
        }
    }

    #[test]
    fn test_share_proof_single_shares() {
        let (square, _, eds, dah) = setup();
        for index in 0..square.shares.len() {
            let proof = ShareProof::new(&eds, &dah, index..index + 1).unwrap();
            assert!(proof.validate(&dah.hash()).is_ok(), "share {index}");
        }
    }

    #[test]
    fn test_share_proof_invalid() {
        let (square, _, eds, dah) = setup();
        let size = square.size;

        // Test case 1: empty and out of bounds ranges
        assert!(matches!(
            ShareProof::new(&eds, &dah, 2..2),
            Err(Error::InvalidShareRange { start: 2, end: 2 })
        ));
        assert!(matches!(
            ShareProof::new(&eds, &dah, 0..size * size + 1),
            Err(Error::InvalidShareRange { .. })
        ));

        // Test case 2: transactions and the first blob
        let first_blob = square
            .shares
            .iter()
            .position(|share| !share.namespace().is_reserved())
            .unwrap();
        assert!(matches!(
            ShareProof::new(&eds, &dah, 0..first_blob + 1),
            Err(Error::MixedNamespaces)
        ));

        // Test case 3: tampered share
        let mut proof = ShareProof::new(&eds, &dah, 0..2).unwrap();
        proof.data[1][100] ^= 1;
        assert!(proof.validate(&dah.hash()).is_err());

        // Test case 4: wrong data root
        let proof = ShareProof::new(&eds, &dah, 0..2).unwrap();
        assert!(matches!(
            proof.validate(&hash(b"other")),
            Err(Error::Cryptography(_))
        ));

        // Test case 5: missing share
        let mut proof = ShareProof::new(&eds, &dah, 0..2).unwrap();
        proof.data.pop();
        assert!(matches!(
            proof.validate(&dah.hash()),
            Err(Error::InvalidProof)
        ));
    }

    #[test]
    fn test_row_proof() {
        let (_, _, _, dah) = setup();
        let rows = dah.row_roots().len();
        let proof = RowProof::new(&dah, 0, rows - 1).unwrap();
        assert_eq!(proof.row_roots.len(), rows);
        assert!(proof.validate(&dah.hash()).is_ok());

        // Tampered row root
        let mut tampered = proof.clone();
        tampered.row_roots.swap(0, 1);
        assert!(tampered.validate(&dah.hash()).is_err());

        // Shifted rows
        let mut shifted = RowProof::new(&dah, 1, 2).unwrap();
        shifted.start_row = 0;
        shifted.end_row = 1;
        assert!(matches!(
            shifted.validate(&dah.hash()),
            Err(Error::InvalidProof)
        ));

        // Invalid ranges
        assert!(matches!(
            RowProof::new(&dah, 2, 1),
            Err(Error::InvalidRowRange { start: 2, end: 1 })
        ));
        assert!(matches!(
            RowProof::new(&dah, 0, rows),
            Err(Error::InvalidRowRange { .. })
        ));
    }
}
