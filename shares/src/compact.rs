//! Pack length-delimited units (transactions) back to back into compact shares.
//!
//! Each compact share carries a reserved offset pointing at the first unit that begins inside
//! it (or 0 if none does), so a reader can start parsing from any share of the sequence.

use crate::{
    consts::{
        COMPACT_SHARE_RESERVED_BYTES, CONTINUATION_COMPACT_SHARE_CONTENT_SIZE,
        FIRST_COMPACT_SHARE_CONTENT_SIZE, SEQUENCE_LEN_BYTES, SHARE_SIZE,
    },
    info_byte::InfoByte,
    namespace::Namespace,
    share::{header_len, Share, SEQUENCE_LEN_OFFSET},
    Error,
};
use std::ops::Range;
use tessera_utils::length_delimit;

/// Number of compact shares needed to hold `sequence_len` bytes.
pub fn compact_shares_needed(sequence_len: usize) -> usize {
    if sequence_len == 0 {
        return 0;
    }
    if sequence_len <= FIRST_COMPACT_SHARE_CONTENT_SIZE {
        return 1;
    }
    let rest = sequence_len - FIRST_COMPACT_SHARE_CONTENT_SIZE;
    1 + rest.div_ceil(CONTINUATION_COMPACT_SHARE_CONTENT_SIZE)
}

/// Writes units into a single compact share sequence.
pub struct CompactShareSplitter {
    namespace: Namespace,
    continuation: InfoByte,

    shares: Vec<Vec<u8>>,
    pending: Vec<u8>,
    written: usize,
    ranges: Vec<Range<usize>>,
}

impl CompactShareSplitter {
    /// Create a splitter for `namespace` writing shares of `share_version`.
    pub fn new(namespace: Namespace, share_version: u8) -> Result<Self, Error> {
        let start = InfoByte::new(share_version, true)?;
        let continuation = InfoByte::new(share_version, false)?;
        Ok(Self {
            namespace,
            continuation,
            shares: Vec::new(),
            pending: Share::header(&namespace, start, true),
            written: 0,
            ranges: Vec::new(),
        })
    }

    /// Write a transaction prefixed with its varint length.
    pub fn write_tx(&mut self, tx: &[u8]) {
        self.write_bytes(&length_delimit(tx));
    }

    /// Write a unit as-is.
    pub fn write_bytes(&mut self, mut unit: &[u8]) {
        if unit.is_empty() {
            return;
        }
        let first_share = self.shares.len();
        if self.pending_is_empty() {
            let offset = self.pending.len();
            self.set_reserved(offset);
        }
        self.written += unit.len();

        loop {
            let space = SHARE_SIZE - self.pending.len();
            if unit.len() <= space {
                self.pending.extend_from_slice(unit);
                break;
            }

            // Fill the pending share and carry the rest over
            let (chunk, rest) = unit.split_at(space);
            self.pending.extend_from_slice(chunk);
            self.stack_pending();
            unit = rest;

            let cursor = self.pending.len() + unit.len();
            self.set_reserved(if cursor < SHARE_SIZE { cursor } else { 0 });
        }
        if self.pending.len() == SHARE_SIZE {
            self.stack_pending();
        }

        let last_share = if self.pending_is_empty() {
            self.shares.len()
        } else {
            self.shares.len() + 1
        };
        self.ranges.push(first_share..last_share);
    }

    /// Number of shares written so far.
    pub fn count(&self) -> usize {
        if self.pending_is_empty() {
            self.shares.len()
        } else {
            self.shares.len() + 1
        }
    }

    /// Range of shares occupied by each unit (in write order), shifted by `offset`.
    pub fn share_ranges(&self, offset: usize) -> Vec<Range<usize>> {
        self.ranges
            .iter()
            .map(|range| range.start + offset..range.end + offset)
            .collect()
    }

    /// Zero-pad the last share, record the total sequence length and return the shares.
    pub fn export(mut self) -> Vec<Share> {
        if !self.pending_is_empty() {
            self.pending.resize(SHARE_SIZE, 0);
            let pending = std::mem::take(&mut self.pending);
            self.shares.push(pending);
        }
        let Some(first) = self.shares.first_mut() else {
            return Vec::new();
        };
        let len = self.written as u32;
        first[SEQUENCE_LEN_OFFSET..SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES]
            .copy_from_slice(&len.to_be_bytes());

        let namespace = self.namespace;
        self.shares
            .into_iter()
            .map(|data| Share::from_parts(namespace, data))
            .collect()
    }

    fn header_len(&self) -> usize {
        header_len(self.shares.is_empty(), true)
    }

    fn pending_is_empty(&self) -> bool {
        self.pending.len() == self.header_len()
    }

    fn set_reserved(&mut self, offset: usize) {
        let end = self.header_len();
        let start = end - COMPACT_SHARE_RESERVED_BYTES;
        self.pending[start..end].copy_from_slice(&(offset as u32).to_be_bytes());
    }

    fn stack_pending(&mut self) {
        let next = Share::header(&self.namespace, self.continuation, true);
        let full = std::mem::replace(&mut self.pending, next);
        self.shares.push(full);
    }
}
