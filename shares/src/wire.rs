//! Protobuf envelopes that travel with transactions.

use crate::Error;
use prost::Message;

/// Type id of an [IndexWrapper].
pub const INDEX_WRAPPER_TYPE_ID: &str = "INDX";

/// A transaction wrapped with the share indexes of the blobs it pays for.
#[derive(Clone, PartialEq, Message)]
pub struct IndexWrapper {
    #[prost(bytes = "vec", tag = "1")]
    pub tx: Vec<u8>,
    #[prost(uint32, repeated, tag = "2")]
    pub share_indexes: Vec<u32>,
    #[prost(string, tag = "3")]
    pub type_id: String,
}

/// Wrap `tx` with the share indexes of its blobs.
pub fn marshal_index_wrapper(tx: &[u8], share_indexes: &[u32]) -> Vec<u8> {
    IndexWrapper {
        tx: tx.to_vec(),
        share_indexes: share_indexes.to_vec(),
        type_id: INDEX_WRAPPER_TYPE_ID.to_string(),
    }
    .encode_to_vec()
}

/// Decode an [IndexWrapper], failing if `tx` is not one.
pub fn unmarshal_index_wrapper(tx: &[u8]) -> Result<IndexWrapper, Error> {
    let wrapper = IndexWrapper::decode(tx)?;
    if wrapper.type_id != INDEX_WRAPPER_TYPE_ID {
        return Err(Error::UnexpectedTypeId(wrapper.type_id));
    }
    Ok(wrapper)
}

/// Collect the share indexes of every index wrapped transaction.
///
/// Returns no indexes if any wrapped index is 0: such blocks predate share indexes (a blob can
/// never start at share 0 because its pay-for-blob transaction occupies it).
pub fn extract_share_indexes<T: AsRef<[u8]>>(txs: &[T]) -> Vec<u32> {
    let mut indexes = Vec::new();
    for tx in txs {
        let Ok(wrapper) = unmarshal_index_wrapper(tx.as_ref()) else {
            continue;
        };
        if wrapper.share_indexes.contains(&0) {
            return Vec::new();
        }
        indexes.extend(wrapper.share_indexes);
    }
    indexes
}
