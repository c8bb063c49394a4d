//! Reassemble share sequences, transactions and blobs from shares.

use crate::{
    blob::Blob,
    compact::compact_shares_needed,
    namespace::Namespace,
    share::{self, Share},
    sparse::sparse_shares_needed,
    square::BlockData,
    Error,
};
use tessera_utils::split_delimited;
use tracing::debug;

/// Consecutive shares that encode one logical payload in a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSequence {
    pub namespace: Namespace,
    pub shares: Vec<Share>,
}

impl ShareSequence {
    /// Length declared by the first share.
    pub fn sequence_len(&self) -> u32 {
        self.shares.first().map_or(0, Share::sequence_len)
    }

    /// Concatenated payload truncated to the declared length.
    pub fn raw_data(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for share in &self.shares {
            data.extend_from_slice(share.raw_data());
        }
        data.truncate(self.sequence_len() as usize);
        data
    }

    /// Returns true if the sequence is a lone padding share.
    pub fn is_padding(&self) -> bool {
        match self.shares.as_slice() {
            [share] => share.is_padding(),
            _ => false,
        }
    }

    fn is_compact(&self) -> bool {
        self.shares.first().is_some_and(Share::is_compact_share)
    }

    /// Check that the declared length implies exactly the number of shares present.
    pub fn validate(&self) -> Result<(), Error> {
        let sequence_len = self.sequence_len();
        if self.shares.len() == 1 && sequence_len == 0 {
            return Ok(());
        }
        let needed = if self.is_compact() {
            compact_shares_needed(sequence_len as usize)
        } else {
            sparse_shares_needed(sequence_len as usize)
        };
        if needed != self.shares.len() {
            return Err(Error::InvalidSequenceLength {
                namespace: self.namespace,
                sequence_len,
                shares: self.shares.len(),
            });
        }
        Ok(())
    }
}

/// Group raw shares into sequences, optionally dropping lone padding shares.
pub fn parse_shares<T: AsRef<[u8]>>(
    shares: &[T],
    ignore_padding: bool,
) -> Result<Vec<ShareSequence>, Error> {
    let shares = share::from_bytes(shares)?;
    let mut sequences: Vec<ShareSequence> = Vec::new();
    for (index, share) in shares.into_iter().enumerate() {
        if share.is_sequence_start() {
            sequences.push(ShareSequence {
                namespace: share.namespace(),
                shares: vec![share],
            });
            continue;
        }
        let Some(sequence) = sequences.last_mut() else {
            return Err(Error::UnexpectedContinuation(index));
        };
        if sequence.namespace != share.namespace() {
            return Err(Error::NamespaceMismatch {
                index,
                expected: sequence.namespace,
                found: share.namespace(),
            });
        }
        sequence.shares.push(share);
    }

    for sequence in &sequences {
        sequence.validate()?;
    }
    if ignore_padding {
        sequences.retain(|sequence| !sequence.is_padding());
    }
    Ok(sequences)
}

fn units(sequence: &ShareSequence) -> Result<Vec<Vec<u8>>, Error> {
    split_delimited(&sequence.raw_data()).ok_or(Error::MalformedUnits(sequence.namespace))
}

fn blob(sequence: &ShareSequence) -> Result<Blob, Error> {
    let version = sequence.shares.first().map_or(0, Share::version);
    Blob::new(sequence.namespace, sequence.raw_data(), version)
}

/// Extract the length-delimited units of every compact sequence.
pub fn parse_txs<T: AsRef<[u8]>>(shares: &[T]) -> Result<Vec<Vec<u8>>, Error> {
    let mut txs = Vec::new();
    for sequence in parse_shares(shares, true)? {
        if sequence.is_compact() {
            txs.extend(units(&sequence)?);
        }
    }
    Ok(txs)
}

/// Extract the blobs of every sparse sequence.
pub fn parse_blobs<T: AsRef<[u8]>>(shares: &[T]) -> Result<Vec<Blob>, Error> {
    parse_shares(shares, true)?
        .iter()
        .filter(|sequence| !sequence.is_compact())
        .map(blob)
        .collect()
}

/// Recover the transactions and blobs laid out in a square of `square_size`.
pub fn merge<T: AsRef<[u8]>>(shares: &[T], square_size: usize) -> Result<BlockData, Error> {
    let expected = square_size
        .checked_mul(square_size)
        .ok_or(Error::SquareAreaOverflow(square_size))?;
    if shares.len() != expected {
        return Err(Error::InvalidShareCount {
            size: square_size,
            expected,
            found: shares.len(),
        });
    }

    let mut txs = Vec::new();
    let mut blobs = Vec::new();
    for sequence in parse_shares(shares, true)? {
        if sequence.is_compact() {
            txs.extend(units(&sequence)?);
        } else {
            blobs.push(blob(&sequence)?);
        }
    }
    debug!(
        square_size,
        txs = txs.len(),
        blobs = blobs.len(),
        "merged square"
    );
    Ok(BlockData {
        txs,
        blobs,
        square_size,
    })
}
