//! The message that pays for blobs.

use crate::{gas::gas_to_consume, Error, GasConfig};
use prost::Message;
use tessera_inclusion::create_commitments;
use tessera_shares::{namespace, Blob, Namespace};
use tracing::debug;

/// Pays for the inclusion of one or more blobs.
///
/// Entry `i` of every list describes blob `i`.
#[derive(Clone, PartialEq, Message)]
pub struct MsgPayForBlobs {
    #[prost(string, tag = "1")]
    pub signer: String,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub namespaces: Vec<Vec<u8>>,
    #[prost(uint32, repeated, tag = "3")]
    pub blob_sizes: Vec<u32>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    pub share_commitments: Vec<Vec<u8>>,
    #[prost(uint32, repeated, tag = "8")]
    pub share_versions: Vec<u32>,
}

impl MsgPayForBlobs {
    /// Create a message paying for `blobs` on behalf of `signer`.
    pub fn new(signer: &str, blobs: &[Blob]) -> Result<Self, Error> {
        if blobs.is_empty() {
            return Err(Error::NoBlobs);
        }
        let commitments = create_commitments(blobs)?;
        let msg = Self {
            signer: signer.to_string(),
            namespaces: blobs
                .iter()
                .map(|blob| blob.namespace().as_bytes().to_vec())
                .collect(),
            blob_sizes: blobs.iter().map(|blob| blob.len() as u32).collect(),
            share_commitments: commitments
                .iter()
                .map(|commitment| commitment.as_ref().to_vec())
                .collect(),
            share_versions: blobs
                .iter()
                .map(|blob| u32::from(blob.share_version()))
                .collect(),
        };
        msg.validate_basic()?;
        debug!(blobs = blobs.len(), "created pay for blobs message");
        Ok(msg)
    }

    /// Stateless checks of the message.
    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.namespaces.is_empty() {
            return Err(Error::NoNamespaces);
        }
        if self.share_versions.is_empty() {
            return Err(Error::NoShareVersions);
        }
        if self.blob_sizes.is_empty() {
            return Err(Error::NoBlobSizes);
        }
        if self.share_commitments.is_empty() {
            return Err(Error::NoShareCommitments);
        }
        let namespaces = self.namespaces.len();
        if self.share_versions.len() != namespaces
            || self.blob_sizes.len() != namespaces
            || self.share_commitments.len() != namespaces
        {
            return Err(Error::MismatchedComponents {
                namespaces,
                sizes: self.blob_sizes.len(),
                commitments: self.share_commitments.len(),
                versions: self.share_versions.len(),
            });
        }
        for namespace in &self.namespaces {
            validate_blob_namespace(Namespace::from_bytes(namespace)?)?;
        }
        if self.share_commitments.iter().any(Vec::is_empty) {
            return Err(Error::EmptyShareCommitment);
        }
        if let Some(&version) = self.share_versions.iter().find(|&&version| version != 0) {
            return Err(Error::UnsupportedShareVersion(version));
        }
        if self.signer.is_empty() {
            return Err(Error::EmptySigner);
        }
        Ok(())
    }

    /// Gas charged for the blobs paid for by the message.
    pub fn gas(&self, config: &GasConfig) -> u64 {
        gas_to_consume(&self.blob_sizes, config.gas_per_blob_byte)
    }
}

/// Map the reasons a namespace cannot carry blobs to their own errors.
pub(crate) fn validate_blob_namespace(namespace: Namespace) -> Result<Namespace, Error> {
    match namespace.validate_for_blob() {
        Ok(()) => Ok(namespace),
        Err(namespace::Error::ParityShares) => Err(Error::ParitySharesNamespace),
        Err(namespace::Error::TailPadding) => Err(Error::TailPaddingNamespace),
        Err(namespace::Error::Reserved(namespace)) => Err(Error::ReservedNamespace(namespace)),
        Err(err) => Err(Error::InvalidNamespace(err)),
    }
}
