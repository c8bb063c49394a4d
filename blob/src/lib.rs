//! Pay for blobs and validate the transactions that carry them.
//!
//! # Status
//!
//! `tessera-blob` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use tessera_shares::Namespace;
use thiserror::Error;

pub mod gas;
pub use gas::{gas_to_consume, max_blob_size, GasConfig};
pub mod payment;
pub use payment::MsgPayForBlobs;
pub mod tx;
pub use tx::{
    marshal_blob_tx, unmarshal_blob_tx, validate_blob_tx, validate_blobs, BlobProto, BlobTx,
    BLOB_TX_TYPE_ID,
};

/// Errors that can occur when paying for or validating blobs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("shares: {0}")]
    Shares(#[from] tessera_shares::Error),
    #[error("inclusion: {0}")]
    Inclusion(#[from] tessera_inclusion::Error),
    #[error("decode: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("invalid namespace: {0}")]
    InvalidNamespace(#[from] tessera_shares::namespace::Error),
    #[error("invalid namespace version: {0}")]
    InvalidNamespaceVersion(u32),
    #[error("reserved namespace: {0}")]
    ReservedNamespace(Namespace),
    #[error("parity shares namespace")]
    ParitySharesNamespace,
    #[error("tail padding namespace")]
    TailPaddingNamespace,
    #[error("no namespaces provided")]
    NoNamespaces,
    #[error("no share versions provided")]
    NoShareVersions,
    #[error("no blob sizes provided")]
    NoBlobSizes,
    #[error("no share commitments provided")]
    NoShareCommitments,
    #[error("no blobs provided")]
    NoBlobs,
    #[error("mismatched number of components: {namespaces} namespaces, {sizes} blob sizes, {commitments} share commitments, {versions} share versions")]
    MismatchedComponents {
        namespaces: usize,
        sizes: usize,
        commitments: usize,
        versions: usize,
    },
    #[error("empty share commitment")]
    EmptyShareCommitment,
    #[error("unsupported share version: {0}")]
    UnsupportedShareVersion(u32),
    #[error("empty signer")]
    EmptySigner,
    #[error("number of blobs ({blobs}) does not match the message ({expected})")]
    BlobCountMismatch { blobs: usize, expected: usize },
    #[error("namespace of blob {0} does not match the message")]
    NamespaceMismatch(usize),
    #[error("size of blob {index} does not match the message: {size} != {expected}")]
    BlobSizeMismatch {
        index: usize,
        size: usize,
        expected: u32,
    },
    #[error("share version of blob {0} does not match the message")]
    ShareVersionMismatch(usize),
    #[error("share commitment of blob {0} does not match the message")]
    InvalidShareCommitment(usize),
    #[error("unexpected type id: {0}")]
    UnexpectedTypeId(String),
}
