pub mod backends;
pub mod byte_size;
pub mod client;
mod load;

// std
// crates
use bytes::Bytes;
use da_commitments::{wire, CommitmentError, CommitmentType, OpCommitment};
use da_verifier::{BlobCodecError, VerificationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
// internal
pub use backends::eigenda::{EigenDaStore, EigenDaStoreSettings};
pub use backends::memory::{MemStore, MemStoreSettings};
use client::{BlobStatus, ClientError};
pub use load::{load_store, LoadStoreError, MemStoreConfig, StoreSettings};

/// Representation of the bytes returned by [`Store::get`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// The payload as it was put.
    #[default]
    Binary,
    /// The encoded blob, field elements in evaluation form.
    Polynomial,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Blob not found")]
    NotFound,
    #[error("Blob expired")]
    Expired,
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationError),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(#[from] ClientError),
    #[error("Blob of {size} bytes exceeds the maximum of {max} bytes")]
    BlobTooLarge { size: usize, max: usize },
    #[error("Malformed commitment: {0}")]
    Commitment(#[from] CommitmentError),
    #[error("Commitment type {0:?} is not supported by this store")]
    UnsupportedCommitment(CommitmentType),
    #[error("Malformed certificate: {0}")]
    Certificate(#[source] wire::Error),
    #[error("Dispersal timed out, last status {last_status:?}")]
    DispersalTimeout { last_status: BlobStatus },
    #[error("Dispersal failed with status {status:?}")]
    DispersalFailed { status: BlobStatus },
    #[error("Operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Codec(#[from] BlobCodecError),
    #[error("Verification task failed: {0}")]
    VerificationTask(#[source] tokio::task::JoinError),
}

/// Commitment addressed blob storage.
///
/// Both operations watch `cancel` and return [`StoreError::Cancelled`] as soon as it fires.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Store `data`, returns the commitment it can be read back with.
    /// Payloads above the configured maximum are rejected before any I/O.
    async fn put(&self, cancel: &CancellationToken, data: Bytes)
        -> Result<OpCommitment, StoreError>;

    /// Read back the blob addressed by `commitment`. The blob is always verified against the
    /// commitment before it is decoded into `domain`.
    async fn get(
        &self,
        cancel: &CancellationToken,
        commitment: &OpCommitment,
        domain: Domain,
    ) -> Result<Bytes, StoreError>;
}
