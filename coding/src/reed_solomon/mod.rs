//! Systematic Reed-Solomon code over GF(2^16), backed by `reed-solomon-simd`.
//!
//! Originals are the evaluations of a polynomial of degree `< k` and parity shards are its
//! evaluations at `k` further points. A constant axis therefore extends to a constant axis.

use crate::{Codec, Error};
use reed_solomon_simd::{ReedSolomonDecoder, ReedSolomonEncoder};

/// Reed-Solomon [Codec] producing as many parity shards as original shards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReedSolomon;

fn shard_size<'a>(mut shards: impl Iterator<Item = &'a [u8]>) -> Result<usize, Error> {
    let size = shards.next().map_or(0, <[u8]>::len);
    if size == 0 || size % 2 != 0 {
        return Err(Error::InvalidShardSize(size));
    }
    if let Some(other) = shards.find(|shard| shard.len() != size) {
        return Err(Error::InvalidShardSize(other.len()));
    }
    Ok(size)
}

fn encode(data: &[&[u8]], size: usize) -> Result<Vec<Vec<u8>>, Error> {
    let mut encoder = ReedSolomonEncoder::new(data.len(), data.len(), size)?;
    for shard in data {
        encoder.add_original_shard(shard)?;
    }
    let result = encoder.encode()?;
    Ok(result.recovery_iter().map(<[u8]>::to_vec).collect())
}

impl Codec for ReedSolomon {
    fn encode(&self, data: &[&[u8]]) -> Result<Vec<Vec<u8>>, Error> {
        if data.is_empty() {
            return Err(Error::InvalidShareCount(0));
        }
        let size = shard_size(data.iter().copied())?;
        encode(data, size)
    }

    fn reconstruct(&self, axis: &mut [Option<Vec<u8>>]) -> Result<(), Error> {
        if axis.is_empty() || axis.len() % 2 != 0 {
            return Err(Error::InvalidAxisLength(axis.len()));
        }
        let k = axis.len() / 2;
        let have = axis.iter().filter(|shard| shard.is_some()).count();
        if have < k {
            return Err(Error::NotEnoughShards { have, need: k });
        }
        let size = shard_size(axis.iter().flatten().map(Vec::as_slice))?;

        // Recover missing originals
        let (originals, parity) = axis.split_at_mut(k);
        if originals.iter().any(Option::is_none) {
            let mut decoder = ReedSolomonDecoder::new(k, k, size)?;
            for (index, shard) in originals.iter().enumerate() {
                if let Some(shard) = shard {
                    decoder.add_original_shard(index, shard)?;
                }
            }
            for (index, shard) in parity.iter().enumerate() {
                if let Some(shard) = shard {
                    decoder.add_recovery_shard(index, shard)?;
                }
            }
            let result = decoder.decode()?;
            for (index, shard) in result.restored_original_iter() {
                originals[index] = Some(shard.to_vec());
            }
        }

        // Re-encode to fill (and check) parity
        let data = originals
            .iter()
            .map(|shard| shard.as_deref().ok_or(Error::Unrepairable))
            .collect::<Result<Vec<_>, _>>()?;
        let computed = encode(&data, size)?;
        for (slot, shard) in parity.iter_mut().zip(computed) {
            match slot {
                Some(existing) if *existing != shard => return Err(Error::Inconsistent),
                Some(_) => {}
                None => *slot = Some(shard),
            }
        }
        Ok(())
    }
}
