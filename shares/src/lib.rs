//! Split transactions and blobs into namespaced shares and lay them out in a square.
//!
//! # Status
//!
//! `tessera-shares` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use thiserror::Error;

pub mod blob;
pub mod compact;
pub mod consts;
pub mod info_byte;
pub mod namespace;
pub mod padding;
pub mod parse;
pub mod share;
pub mod sparse;
pub mod square;
pub mod wire;

pub use blob::Blob;
pub use compact::{compact_shares_needed, CompactShareSplitter};
pub use info_byte::InfoByte;
pub use namespace::{random_blob_namespace, Namespace};
pub use parse::{merge, parse_blobs, parse_shares, parse_txs, ShareSequence};
pub use share::Share;
pub use sparse::{sparse_shares_needed, SparseShareSplitter};
pub use square::{
    blob_min_square_size, build, next_aligned_index, split, split_blobs, split_txs, BlockData,
    Config, Square,
};

/// Errors that can occur when building, splitting or parsing shares.
#[derive(Error, Debug)]
pub enum Error {
    #[error("namespace: {0}")]
    Namespace(#[from] namespace::Error),
    #[error("share version out of range: {0}")]
    VersionOutOfRange(u8),
    #[error("unsupported share version: {0}")]
    UnsupportedShareVersion(u8),
    #[error("invalid share size: {0}")]
    InvalidShareSize(usize),
    #[error("blob data is empty")]
    EmptyBlob,
    #[error("blob too large: {0} bytes")]
    BlobTooLarge(usize),
    #[error("cannot write padding on an empty splitter")]
    EmptySplitter,
    #[error("no blob starts at share {0}")]
    InvalidBlobIndex(usize),
    #[error("continuation share {0} does not follow a sequence")]
    UnexpectedContinuation(usize),
    #[error("continuation share {index} has namespace {found} but sequence has {expected}")]
    NamespaceMismatch {
        index: usize,
        expected: Namespace,
        found: Namespace,
    },
    #[error("sequence in {namespace} declares {sequence_len} bytes but has {shares} shares")]
    InvalidSequenceLength {
        namespace: Namespace,
        sequence_len: u32,
        shares: usize,
    },
    #[error("malformed length delimited units in {0}")]
    MalformedUnits(Namespace),
    #[error("square size is not a power of two: {0}")]
    InvalidSquareSize(usize),
    #[error("share count of square size {0} overflows")]
    SquareAreaOverflow(usize),
    #[error("square size {size} outside of [{min}, {max}]")]
    SquareSizeOutOfRange { size: usize, min: usize, max: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("expected {expected} shares for square of size {size} but got {found}")]
    InvalidShareCount {
        size: usize,
        expected: usize,
        found: usize,
    },
    #[error("the first blob started at an unexpected index: {index} < {cursor}")]
    UnexpectedFirstBlobShareIndex { index: usize, cursor: usize },
    #[error("blob share index {index} precedes cursor {cursor}")]
    UnexpectedBlobShareIndex { index: usize, cursor: usize },
    #[error("number of share indexes ({indexes}) does not match number of blobs ({blobs})")]
    IncorrectNumberOfIndexes { indexes: usize, blobs: usize },
    #[error("square overflow: {shares} shares do not fit in {capacity}")]
    SquareOverflow { shares: usize, capacity: usize },
    #[error("unexpected type id: {0}")]
    UnexpectedTypeId(String),
    #[error("unable to decode: {0}")]
    Decode(#[from] prost::DecodeError),
}
