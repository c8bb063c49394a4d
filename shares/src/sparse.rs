//! Split blobs into sparse shares, one sequence per blob.

use crate::{
    blob::Blob,
    consts::{
        CONTINUATION_SPARSE_SHARE_CONTENT_SIZE, FIRST_SPARSE_SHARE_CONTENT_SIZE,
        SEQUENCE_LEN_BYTES, SHARE_SIZE, SHARE_VERSION_ZERO, SUPPORTED_SHARE_VERSIONS,
    },
    info_byte::InfoByte,
    padding::namespace_padding_shares,
    share::{Share, SEQUENCE_LEN_OFFSET},
    Error,
};

/// Number of sparse shares needed to hold `sequence_len` bytes.
pub fn sparse_shares_needed(sequence_len: usize) -> usize {
    if sequence_len == 0 {
        return 0;
    }
    if sequence_len <= FIRST_SPARSE_SHARE_CONTENT_SIZE {
        return 1;
    }
    let rest = sequence_len - FIRST_SPARSE_SHARE_CONTENT_SIZE;
    1 + rest.div_ceil(CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
}

/// Split a single blob into its sparse shares.
pub(crate) fn split_blob(blob: &Blob) -> Result<Vec<Share>, Error> {
    let namespace = blob.namespace();
    let start = InfoByte::new(blob.share_version(), true)?;
    let continuation = InfoByte::new(blob.share_version(), false)?;

    let data = blob.data();
    let mut shares = Vec::with_capacity(sparse_shares_needed(data.len()));
    let (first, mut rest) = data.split_at(data.len().min(FIRST_SPARSE_SHARE_CONTENT_SIZE));
    let mut share = Share::header(&namespace, start, false);
    share[SEQUENCE_LEN_OFFSET..SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES]
        .copy_from_slice(&(data.len() as u32).to_be_bytes());
    share.extend_from_slice(first);
    share.resize(SHARE_SIZE, 0);
    shares.push(Share::from_parts(namespace, share));

    while !rest.is_empty() {
        let (chunk, next) = rest.split_at(rest.len().min(CONTINUATION_SPARSE_SHARE_CONTENT_SIZE));
        let mut share = Share::header(&namespace, continuation, false);
        share.extend_from_slice(chunk);
        share.resize(SHARE_SIZE, 0);
        shares.push(Share::from_parts(namespace, share));
        rest = next;
    }
    Ok(shares)
}

/// Accumulates the shares of many blobs, with optional padding between them.
#[derive(Default)]
pub struct SparseShareSplitter {
    shares: Vec<Share>,
}

impl SparseShareSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the shares of `blob`.
    pub fn write(&mut self, blob: &Blob) -> Result<(), Error> {
        if !SUPPORTED_SHARE_VERSIONS.contains(&blob.share_version()) {
            return Err(Error::UnsupportedShareVersion(blob.share_version()));
        }
        let shares = split_blob(blob)?;
        self.shares.extend(shares);
        Ok(())
    }

    /// Append `n` padding shares in the namespace of the last written share.
    pub fn write_namespaced_padded_shares(&mut self, n: usize) -> Result<(), Error> {
        let Some(last) = self.shares.last() else {
            return Err(Error::EmptySplitter);
        };
        if n == 0 {
            return Ok(());
        }
        let padding = namespace_padding_shares(last.namespace(), SHARE_VERSION_ZERO, n)?;
        self.shares.extend(padding);
        Ok(())
    }

    /// Remove the blob starting at share `index` along with one namespace padding share
    /// following it (if any). Returns the number of shares removed.
    pub fn remove_blob(&mut self, index: usize) -> Result<usize, Error> {
        let Some(share) = self.shares.get(index) else {
            return Err(Error::InvalidBlobIndex(index));
        };
        if !share.is_sequence_start() || share.is_namespace_padding() {
            return Err(Error::InvalidBlobIndex(index));
        }
        let mut end = index + sparse_shares_needed(share.sequence_len() as usize);
        if end > self.shares.len() {
            return Err(Error::InvalidBlobIndex(index));
        }
        if self
            .shares
            .get(end)
            .is_some_and(|share| share.is_namespace_padding())
        {
            end += 1;
        }
        self.shares.drain(index..end);
        Ok(end - index)
    }

    /// Number of shares written so far.
    pub fn count(&self) -> usize {
        self.shares.len()
    }

    pub fn export(self) -> Vec<Share> {
        self.shares
    }
}
