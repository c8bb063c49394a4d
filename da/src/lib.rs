//! Extend a square of shares and commit to it with a data availability header.
//!
//! # Status
//!
//! `tessera-da` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use tessera_cryptography::sha256::Digest;
use thiserror::Error;

mod commitment;
pub use commitment::commitment_from_square;
mod extend;
pub use extend::{extend_shares, repair};
pub mod header;
pub use header::{min_data_availability_header, DataAvailabilityHeader};
pub mod proof;
pub use proof::{RowProof, ShareProof};
mod tree;
pub use tree::ErasuredNamespacedMerkleTree;

pub use tessera_coding::ExtendedDataSquare;

/// Errors that can occur when extending, committing to or proving a square.
#[derive(Error, Debug)]
pub enum Error {
    #[error("shares: {0}")]
    Shares(#[from] tessera_shares::Error),
    #[error("coding: {0}")]
    Coding(#[from] tessera_coding::Error),
    #[error("cryptography: {0}")]
    Cryptography(#[from] tessera_cryptography::Error),
    #[error("decode: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("invalid share count: expected {expected}, found {found}")]
    InvalidShareCount { expected: usize, found: usize },
    #[error("share too short to carry a namespace: {0}")]
    ShareTooShort(usize),
    #[error("axis already holds {0} shares")]
    AxisFull(usize),
    #[error("maximum valid DataAvailabilityHeader has at most {0} row and column roots")]
    TooManyRoots(usize),
    #[error("minimum valid DataAvailabilityHeader has at least {0} row and column roots")]
    TooFewRoots(usize),
    #[error("unequal number of row and column roots: {rows} rows, {columns} columns")]
    UnequalRoots { rows: usize, columns: usize },
    #[error("wrong hash: expected {expected}, found {found}")]
    WrongHash { expected: Digest, found: Digest },
    #[error("row root {0} does not match the header")]
    RowRootMismatch(usize),
    #[error("column root {0} does not match the header")]
    ColumnRootMismatch(usize),
    #[error("invalid share range: {start}..{end}")]
    InvalidShareRange { start: usize, end: usize },
    #[error("invalid row range: {start}..={end}")]
    InvalidRowRange { start: usize, end: usize },
    #[error("shares span more than one namespace")]
    MixedNamespaces,
    #[error("invalid proof")]
    InvalidProof,
}
