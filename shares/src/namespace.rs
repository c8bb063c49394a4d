//! Versioned 29-byte identifiers that order shares in a square.
//!
//! A namespace is encoded as `version || id` and compared by that encoding. Only version 0 is
//! supported for user data: its id carries an 18-byte zero prefix so that just the trailing 10
//! bytes vary. The parity and tail padding sentinels sort after every version 0 namespace.

use crate::consts::{
    NAMESPACE_ID_SIZE, NAMESPACE_SIZE, NAMESPACE_VERSION_MAX, NAMESPACE_VERSION_ZERO,
    NAMESPACE_VERSION_ZERO_ID_SIZE, NAMESPACE_VERSION_ZERO_PREFIX_SIZE,
};
use rand::RngCore;
use std::fmt::{Debug, Display};
use tessera_utils::hex;
use thiserror::Error;

/// Errors that can occur when constructing or validating a namespace.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported namespace version: {0}")]
    InvalidVersion(u8),
    #[error("invalid namespace id length: {0}")]
    InvalidIdLength(usize),
    #[error("invalid namespace length: {0}")]
    InvalidLength(usize),
    #[error("version 0 namespace id must start with {NAMESPACE_VERSION_ZERO_PREFIX_SIZE} zero bytes")]
    InvalidPrefix,
    #[error("namespace is reserved: {0}")]
    Reserved(Namespace),
    #[error("parity shares namespace cannot be used for blobs")]
    ParityShares,
    #[error("tail padding namespace cannot be used for blobs")]
    TailPadding,
}

/// A validated namespace.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Namespace([u8; NAMESPACE_SIZE]);

const fn primary_reserved(last: u8) -> Namespace {
    let mut bytes = [0u8; NAMESPACE_SIZE];
    bytes[NAMESPACE_SIZE - 1] = last;
    Namespace(bytes)
}

const fn sentinel(last: u8) -> Namespace {
    let mut bytes = [0xFF; NAMESPACE_SIZE];
    bytes[NAMESPACE_SIZE - 1] = last;
    Namespace(bytes)
}

/// Namespace of ordinary transactions.
pub const TX_NAMESPACE: Namespace = primary_reserved(0x01);

/// Namespace of intermediate state roots.
pub const INTERMEDIATE_STATE_ROOTS_NAMESPACE: Namespace = primary_reserved(0x02);

/// Namespace of evidence.
pub const EVIDENCE_NAMESPACE: Namespace = primary_reserved(0x03);

/// Namespace of transactions that pay for blobs.
pub const PAY_FOR_BLOB_NAMESPACE: Namespace = primary_reserved(0x04);

/// Namespace of padding placed after the reserved namespaces and before blobs.
pub const RESERVED_PADDING_NAMESPACE: Namespace = primary_reserved(0xFF);

/// Largest namespace reserved for protocol use.
pub const MAX_RESERVED_NAMESPACE: Namespace = primary_reserved(0xFF);

/// Namespace of the padding that fills a square after the last blob.
pub const TAIL_PADDING_NAMESPACE: Namespace = sentinel(0xFE);

/// Namespace of erasure coded (parity) shares.
pub const PARITY_SHARES_NAMESPACE: Namespace = sentinel(0xFF);

impl Namespace {
    /// Create a namespace from a version and a 28-byte id.
    pub fn new(version: u8, id: &[u8]) -> Result<Self, Error> {
        if id.len() != NAMESPACE_ID_SIZE {
            return Err(Error::InvalidIdLength(id.len()));
        }
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes[0] = version;
        bytes[1..].copy_from_slice(id);
        let namespace = Self(bytes);
        match version {
            NAMESPACE_VERSION_ZERO => {
                if id[..NAMESPACE_VERSION_ZERO_PREFIX_SIZE]
                    .iter()
                    .any(|b| *b != 0)
                {
                    return Err(Error::InvalidPrefix);
                }
            }
            // Only the sentinels use the maximum version.
            NAMESPACE_VERSION_MAX
                if namespace == PARITY_SHARES_NAMESPACE
                    || namespace == TAIL_PADDING_NAMESPACE => {}
            _ => return Err(Error::InvalidVersion(version)),
        }
        Ok(namespace)
    }

    /// Create a version 0 namespace from at most 10 user-specified bytes, left padded with zeros.
    pub fn new_v0(sub_id: &[u8]) -> Result<Self, Error> {
        if sub_id.len() > NAMESPACE_VERSION_ZERO_ID_SIZE {
            return Err(Error::InvalidIdLength(sub_id.len()));
        }
        let mut id = [0u8; NAMESPACE_ID_SIZE];
        id[NAMESPACE_ID_SIZE - sub_id.len()..].copy_from_slice(sub_id);
        Self::new(NAMESPACE_VERSION_ZERO, &id)
    }

    /// Decode a namespace from its 29-byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != NAMESPACE_SIZE {
            return Err(Error::InvalidLength(bytes.len()));
        }
        Self::new(bytes[0], &bytes[1..])
    }

    /// The 29-byte encoding.
    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }

    pub fn version(&self) -> u8 {
        self.0[0]
    }

    pub fn id(&self) -> &[u8] {
        &self.0[1..]
    }

    /// Returns true if the namespace is reserved for protocol use (including the sentinels).
    pub fn is_reserved(&self) -> bool {
        *self <= MAX_RESERVED_NAMESPACE || self.is_parity_shares() || self.is_tail_padding()
    }

    pub fn is_parity_shares(&self) -> bool {
        *self == PARITY_SHARES_NAMESPACE
    }

    pub fn is_tail_padding(&self) -> bool {
        *self == TAIL_PADDING_NAMESPACE
    }

    pub fn is_reserved_padding(&self) -> bool {
        *self == RESERVED_PADDING_NAMESPACE
    }

    pub fn is_tx(&self) -> bool {
        *self == TX_NAMESPACE
    }

    pub fn is_pay_for_blob(&self) -> bool {
        *self == PAY_FOR_BLOB_NAMESPACE
    }

    /// Returns an error if a blob may not be published under this namespace.
    pub fn validate_for_blob(&self) -> Result<(), Error> {
        if self.version() != NAMESPACE_VERSION_ZERO {
            if self.is_parity_shares() {
                return Err(Error::ParityShares);
            }
            if self.is_tail_padding() {
                return Err(Error::TailPadding);
            }
            return Err(Error::InvalidVersion(self.version()));
        }
        if *self <= MAX_RESERVED_NAMESPACE {
            return Err(Error::Reserved(*self));
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Namespace {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

impl Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

/// Generate a random version 0 namespace that is valid for blobs.
pub fn random_blob_namespace<R: RngCore>(rng: &mut R) -> Namespace {
    loop {
        let mut id = [0u8; NAMESPACE_ID_SIZE];
        rng.fill_bytes(&mut id[NAMESPACE_VERSION_ZERO_PREFIX_SIZE..]);
        let Ok(namespace) = Namespace::new(NAMESPACE_VERSION_ZERO, &id) else {
            continue;
        };
        if namespace.validate_for_blob().is_ok() {
            return namespace;
        }
    }
}
