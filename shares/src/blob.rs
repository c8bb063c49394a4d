//! Namespaced payloads published alongside transactions.

use crate::{consts::SUPPORTED_SHARE_VERSIONS, namespace::Namespace, Error};
use bytes::Bytes;

/// Data a user publishes under a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Blob {
    namespace: Namespace,
    data: Bytes,
    share_version: u8,
}

impl Blob {
    /// Create a blob, rejecting empty data, unsupported share versions and namespaces that are
    /// not available for blobs.
    pub fn new(
        namespace: Namespace,
        data: impl Into<Bytes>,
        share_version: u8,
    ) -> Result<Self, Error> {
        namespace.validate_for_blob()?;
        let data = data.into();
        if data.is_empty() {
            return Err(Error::EmptyBlob);
        }
        if data.len() > u32::MAX as usize {
            return Err(Error::BlobTooLarge(data.len()));
        }
        if !SUPPORTED_SHARE_VERSIONS.contains(&share_version) {
            return Err(Error::UnsupportedShareVersion(share_version));
        }
        Ok(Self {
            namespace,
            data,
            share_version,
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn share_version(&self) -> u8 {
        self.share_version
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
