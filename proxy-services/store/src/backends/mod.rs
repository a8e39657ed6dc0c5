pub mod eigenda;
pub mod memory;

// std
// crates
use bytes::Bytes;
use da_commitments::{BlobInfo, OpCommitment};
use da_verifier::{decode_blob, VerificationError, BYTES_PER_FIELD_ELEMENT};
use tokio_util::sync::CancellationToken;
// internal
use crate::{Domain, StoreError};

fn check_blob_length(data: &[u8], max_blob_length: usize) -> Result<(), StoreError> {
    if data.len() > max_blob_length {
        return Err(StoreError::BlobTooLarge {
            size: data.len(),
            max: max_blob_length,
        });
    }
    Ok(())
}

/// Certificate carried by an EigenDA commitment, the only kind both stores issue.
fn eigenda_certificate(commitment: &OpCommitment) -> Result<BlobInfo, StoreError> {
    let eigenda = commitment
        .as_eigenda()
        .ok_or(StoreError::UnsupportedCommitment(commitment.commitment_type()))?;
    eigenda.certificate().map_err(StoreError::Certificate)
}

/// Run commitment work off the async workers. Returns as soon as `cancel` fires, the work itself
/// is left to finish and its result dropped.
async fn run_blocking<T, F>(cancel: &CancellationToken, work: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, VerificationError> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Cancelled),
        result = task => result
            .map_err(StoreError::VerificationTask)?
            .map_err(StoreError::from),
    }
}

/// The certificate declares how many elements were dispersed. A blob may come back zero padded
/// but never shorter, and never with data past the declared length.
fn check_data_length(info: &BlobInfo, blob: &[u8]) -> Result<(), StoreError> {
    let declared = info.blob_header.data_length as usize;
    match declared
        .checked_mul(BYTES_PER_FIELD_ELEMENT)
        .and_then(|end| blob.get(end..))
    {
        Some(padding) if padding.iter().all(|byte| *byte == 0) => Ok(()),
        _ => Err(VerificationError::DataLengthMismatch {
            declared,
            elements: blob.len() / BYTES_PER_FIELD_ELEMENT,
        }
        .into()),
    }
}

/// Turn a verified blob into the representation the caller asked for.
fn into_domain(blob: Bytes, domain: Domain) -> Result<Bytes, StoreError> {
    match domain {
        Domain::Binary => Ok(decode_blob(&blob)?.into()),
        Domain::Polynomial => Ok(blob),
    }
}
