//! Transactions that carry blobs next to the message paying for them.
//!
//! ```text
//! BlobTx
//! +-------------------------+
//! | tx: MsgPayForBlobs      |  namespaces, sizes, versions, commitments
//! +-------------------------+
//! | blobs: [Blob, Blob, ..] |  checked entry by entry against the message
//! +-------------------------+
//! | type_id: "BLOB"         |
//! +-------------------------+
//! ```

use crate::{payment::validate_blob_namespace, Error, MsgPayForBlobs};
use bytes::Bytes;
use prost::Message;
use tessera_inclusion::create_commitment;
use tessera_shares::{Blob, Namespace};
use tracing::warn;

/// Type id of a [BlobTx].
pub const BLOB_TX_TYPE_ID: &str = "BLOB";

/// Protobuf encoding of a [Blob].
#[derive(Clone, PartialEq, Message)]
pub struct BlobProto {
    #[prost(bytes = "vec", tag = "1")]
    pub namespace_id: Vec<u8>,
    #[prost(bytes = "bytes", tag = "2")]
    pub data: Bytes,
    #[prost(uint32, tag = "3")]
    pub share_version: u32,
    #[prost(uint32, tag = "4")]
    pub namespace_version: u32,
}

impl From<&Blob> for BlobProto {
    fn from(blob: &Blob) -> Self {
        let namespace = blob.namespace();
        Self {
            namespace_id: namespace.id().to_vec(),
            data: blob.data().clone(),
            share_version: u32::from(blob.share_version()),
            namespace_version: u32::from(namespace.version()),
        }
    }
}

/// A transaction (an encoded [MsgPayForBlobs]) along with the blobs it pays for.
#[derive(Clone, PartialEq, Message)]
pub struct BlobTx {
    #[prost(bytes = "vec", tag = "1")]
    pub tx: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub blobs: Vec<BlobProto>,
    #[prost(string, tag = "3")]
    pub type_id: String,
}

/// Wrap `tx` with the blobs it pays for.
pub fn marshal_blob_tx(tx: &[u8], blobs: &[Blob]) -> Vec<u8> {
    BlobTx {
        tx: tx.to_vec(),
        blobs: blobs.iter().map(BlobProto::from).collect(),
        type_id: BLOB_TX_TYPE_ID.to_string(),
    }
    .encode_to_vec()
}

/// Decode a [BlobTx], failing if `tx` is not one.
pub fn unmarshal_blob_tx(tx: &[u8]) -> Result<BlobTx, Error> {
    let blob_tx = BlobTx::decode(tx)?;
    if blob_tx.type_id != BLOB_TX_TYPE_ID {
        return Err(Error::UnexpectedTypeId(blob_tx.type_id));
    }
    Ok(blob_tx)
}

/// Convert and check encoded blobs.
pub fn validate_blobs(blobs: &[BlobProto]) -> Result<Vec<Blob>, Error> {
    if blobs.is_empty() {
        return Err(Error::NoBlobs);
    }
    blobs
        .iter()
        .map(|blob| -> Result<Blob, Error> {
            let version = u8::try_from(blob.namespace_version)
                .map_err(|_| Error::InvalidNamespaceVersion(blob.namespace_version))?;
            let namespace = validate_blob_namespace(Namespace::new(version, &blob.namespace_id)?)?;
            let share_version = u8::try_from(blob.share_version)
                .map_err(|_| Error::UnsupportedShareVersion(blob.share_version))?;
            Ok(Blob::new(namespace, blob.data.clone(), share_version)?)
        })
        .collect()
}

/// Check that the blobs of `blob_tx` are exactly the ones paid for by its message.
///
/// Returns the message.
pub fn validate_blob_tx(blob_tx: &BlobTx) -> Result<MsgPayForBlobs, Error> {
    let blobs = validate_blobs(&blob_tx.blobs)?;
    let msg = MsgPayForBlobs::decode(blob_tx.tx.as_slice())?;
    msg.validate_basic()?;
    if msg.namespaces.len() != blobs.len() {
        return Err(Error::BlobCountMismatch {
            blobs: blobs.len(),
            expected: msg.namespaces.len(),
        });
    }

    for (index, blob) in blobs.iter().enumerate() {
        if msg.namespaces[index] != blob.namespace().as_bytes() {
            return Err(Error::NamespaceMismatch(index));
        }
        if msg.blob_sizes[index] as usize != blob.len() {
            return Err(Error::BlobSizeMismatch {
                index,
                size: blob.len(),
                expected: msg.blob_sizes[index],
            });
        }
        if msg.share_versions[index] != u32::from(blob.share_version()) {
            return Err(Error::ShareVersionMismatch(index));
        }
        let commitment = create_commitment(blob)?;
        if msg.share_commitments[index] != commitment.as_ref() {
            warn!(index, namespace = %blob.namespace(), "rejected blob with wrong commitment");
            return Err(Error::InvalidShareCommitment(index));
        }
    }
    Ok(msg)
}
