// std
use std::sync::Arc;
use std::time::Duration;
// crates
use bytes::Bytes;
use da_commitments::{BlobInfo, EigenDaCommitment, OpCommitment};
use da_verifier::{encode_blob, EncodingVersion, VerificationError, Verifier};
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
// internal
use super::{
    check_blob_length, check_data_length, eigenda_certificate, into_domain, run_blocking,
};
use crate::client::{BlobStatus, BlobStatusReply, ClientError, DisperserClient};
use crate::{Domain, Store, StoreError};

#[derive(Clone, Debug)]
pub struct EigenDaStoreSettings {
    pub max_blob_length: usize,
    pub encoding_version: EncodingVersion,
    pub status_query_timeout: Duration,
    pub status_query_retry_interval: Duration,
}

/// Store backed by an EigenDA disperser.
pub struct EigenDaStore {
    client: Arc<dyn DisperserClient>,
    verifier: Arc<Verifier>,
    settings: EigenDaStoreSettings,
}

impl EigenDaStore {
    pub fn new(
        client: Arc<dyn DisperserClient>,
        verifier: Arc<Verifier>,
        settings: EigenDaStoreSettings,
    ) -> Self {
        Self {
            client,
            verifier,
            settings,
        }
    }

    /// Follow a dispersal until the disperser confirms it, gives up on it, or the status query
    /// window closes.
    async fn wait_for_confirmation(
        &self,
        cancel: &CancellationToken,
        request_id: &[u8],
        mut last_status: BlobStatus,
    ) -> Result<BlobInfo, StoreError> {
        let deadline = sleep(self.settings.status_query_timeout);
        tokio::pin!(deadline);
        let period = self
            .settings
            .status_query_retry_interval
            .max(Duration::from_millis(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let reply = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StoreError::Cancelled),
                _ = &mut deadline => return Err(StoreError::DispersalTimeout { last_status }),
                reply = async {
                    ticker.tick().await;
                    self.client.get_blob_status(request_id).await
                } => reply,
            };
            match reply {
                Ok(BlobStatusReply { status, info }) => {
                    last_status = status;
                    if status.is_failed() {
                        return Err(StoreError::DispersalFailed { status });
                    }
                    if status.is_confirmed() {
                        return info.ok_or_else(|| {
                            StoreError::BackendUnavailable(ClientError::Server(format!(
                                "blob {status:?} without a certificate"
                            )))
                        });
                    }
                    debug!(?status, "Blob not confirmed yet");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to query blob status, retrying");
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl Store for EigenDaStore {
    async fn put(
        &self,
        cancel: &CancellationToken,
        data: Bytes,
    ) -> Result<OpCommitment, StoreError> {
        check_blob_length(&data, self.settings.max_blob_length)?;
        let blob = Bytes::from(encode_blob(self.settings.encoding_version, &data)?);
        let verifier = self.verifier.clone();
        let to_commit = blob.clone();
        let expected = run_blocking(cancel, move || verifier.commit(&to_commit)).await?;

        let dispersal = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoreError::Cancelled),
            reply = self.client.disperse_blob(&blob) => reply?,
        };
        if dispersal.result.is_failed() {
            return Err(StoreError::DispersalFailed {
                status: dispersal.result,
            });
        }
        let request_id = const_hex::encode(&dispersal.request_id);
        debug!(%request_id, size = data.len(), "Blob submitted for dispersal");

        let info = self
            .wait_for_confirmation(cancel, &dispersal.request_id, dispersal.result)
            .await?;
        if info.commitment() != &expected {
            warn!(%request_id, "Disperser certified a different commitment");
            return Err(VerificationError::CommitmentMismatch.into());
        }
        let proof = &info.blob_verification_proof;
        info!(
            %request_id,
            batch_id = proof.batch_id,
            blob_index = proof.blob_index,
            "Blob dispersed"
        );
        let commitment = EigenDaCommitment::from_certificate(&info).map_err(StoreError::Certificate)?;
        Ok(commitment.into())
    }

    async fn get(
        &self,
        cancel: &CancellationToken,
        commitment: &OpCommitment,
        domain: Domain,
    ) -> Result<Bytes, StoreError> {
        let info = eigenda_certificate(commitment)?;
        let proof = &info.blob_verification_proof;
        let retrieved = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoreError::Cancelled),
            blob = self.client.retrieve_blob(&proof.batch_header_hash, proof.blob_index) => blob,
        };
        let blob = match retrieved {
            Ok(blob) => blob,
            Err(ClientError::NotFound) => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };
        check_data_length(&info, &blob)?;
        let verifier = self.verifier.clone();
        let expected = *info.commitment();
        let to_verify = blob.clone();
        run_blocking(cancel, move || verifier.verify(&expected, &to_verify)).await?;
        into_domain(blob, domain)
    }
}
