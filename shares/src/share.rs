//! Fixed-size share format.
//!
//! ```text
//! | namespace (29) | info byte (1) | [sequence len (4)] | [reserved offset (4)] | payload |
//! ```
//!
//! The sequence length is only present on the first share of a sequence and the reserved offset
//! only on compact (transaction or pay-for-blob) shares.

use crate::{
    consts::{
        COMPACT_SHARE_RESERVED_BYTES, NAMESPACE_SIZE, SEQUENCE_LEN_BYTES, SHARE_INFO_BYTES,
        SHARE_SIZE,
    },
    info_byte::InfoByte,
    namespace::Namespace,
    Error,
};
use std::fmt::Debug;
use tessera_utils::hex;

/// Offset of the info byte.
pub(crate) const INFO_BYTE_OFFSET: usize = NAMESPACE_SIZE;

/// Offset of the sequence length in a sequence-start share.
pub(crate) const SEQUENCE_LEN_OFFSET: usize = INFO_BYTE_OFFSET + SHARE_INFO_BYTES;

/// Length of the header of a share with the given shape.
pub(crate) const fn header_len(is_sequence_start: bool, is_compact: bool) -> usize {
    let mut len = NAMESPACE_SIZE + SHARE_INFO_BYTES;
    if is_sequence_start {
        len += SEQUENCE_LEN_BYTES;
    }
    if is_compact {
        len += COMPACT_SHARE_RESERVED_BYTES;
    }
    len
}

/// A validated 512-byte share.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Share {
    namespace: Namespace,
    data: Vec<u8>,
}

impl Share {
    /// Validate and wrap raw share bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        if data.len() != SHARE_SIZE {
            return Err(Error::InvalidShareSize(data.len()));
        }
        let namespace = Namespace::from_bytes(&data[..NAMESPACE_SIZE])?;
        Ok(Self { namespace, data })
    }

    /// Wrap bytes that were assembled by this crate.
    pub(crate) fn from_parts(namespace: Namespace, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), SHARE_SIZE);
        debug_assert_eq!(&data[..NAMESPACE_SIZE], namespace.as_bytes());
        Self { namespace, data }
    }

    /// Start a share with the given header. Sequence length and reserved offset are zeroed.
    pub(crate) fn header(
        namespace: &Namespace,
        info: InfoByte,
        is_compact: bool,
    ) -> Vec<u8> {
        let mut data = Vec::with_capacity(SHARE_SIZE);
        data.extend_from_slice(namespace.as_bytes());
        data.push(info.to_byte());
        data.resize(header_len(info.is_sequence_start(), is_compact), 0);
        data
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn info_byte(&self) -> InfoByte {
        InfoByte::from_byte(self.data[INFO_BYTE_OFFSET])
    }

    pub fn version(&self) -> u8 {
        self.info_byte().version()
    }

    pub fn is_sequence_start(&self) -> bool {
        self.info_byte().is_sequence_start()
    }

    /// Length of the sequence this share starts, or 0 for continuation shares.
    pub fn sequence_len(&self) -> u32 {
        if !self.is_sequence_start() {
            return 0;
        }
        let mut buf = [0u8; SEQUENCE_LEN_BYTES];
        buf.copy_from_slice(&self.data[SEQUENCE_LEN_OFFSET..SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES]);
        u32::from_be_bytes(buf)
    }

    /// Returns true if the share carries a reserved offset (transactions and pay-for-blobs).
    pub fn is_compact_share(&self) -> bool {
        self.namespace.is_tx() || self.namespace.is_pay_for_blob()
    }

    /// Offset where the next unit begins, for compact shares.
    pub fn reserved_offset(&self) -> Option<u32> {
        if !self.is_compact_share() {
            return None;
        }
        let start = header_len(self.is_sequence_start(), false);
        let mut buf = [0u8; COMPACT_SHARE_RESERVED_BYTES];
        buf.copy_from_slice(&self.data[start..start + COMPACT_SHARE_RESERVED_BYTES]);
        Some(u32::from_be_bytes(buf))
    }

    /// Payload following the header.
    pub fn raw_data(&self) -> &[u8] {
        &self.data[header_len(self.is_sequence_start(), self.is_compact_share())..]
    }

    /// Returns true if the share is a sequence start declaring no data.
    pub fn is_namespace_padding(&self) -> bool {
        self.is_sequence_start() && self.sequence_len() == 0
    }

    /// Returns true if the share is namespace, tail or reserved padding.
    pub fn is_padding(&self) -> bool {
        self.is_namespace_padding()
            || self.namespace.is_tail_padding()
            || self.namespace.is_reserved_padding()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<Vec<u8>> for Share {
    type Error = Error;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

impl Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Share({})", hex(&self.data))
    }
}

/// Convert shares into their raw bytes.
pub fn to_bytes(shares: &[Share]) -> Vec<Vec<u8>> {
    shares.iter().map(|share| share.as_bytes().to_vec()).collect()
}

/// Validate raw share bytes.
pub fn from_bytes<T: AsRef<[u8]>>(shares: &[T]) -> Result<Vec<Share>, Error> {
    shares
        .iter()
        .map(|share| Share::from_bytes(share.as_ref().to_vec()))
        .collect()
}
