// std
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
// crates
use bytes::Bytes;
use da_commitments::{
    keccak256, BlobHeader, BlobInfo, BlobVerificationProof, EigenDaCommitment, G1Commitment,
    OpCommitment,
};
use da_verifier::{encode_blob, EncodingVersion, Verifier, BYTES_PER_FIELD_ELEMENT};
use parking_lot::Mutex;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;
// internal
use super::{
    check_blob_length, check_data_length, eigenda_certificate, into_domain, run_blocking,
};
use crate::{Domain, Store, StoreError};

const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct MemStoreSettings {
    pub max_blob_length: usize,
    pub encoding_version: EncodingVersion,
    pub blob_expiration: Duration,
    /// Defaults to the expiration, capped at one minute.
    pub sweep_interval: Option<Duration>,
}

impl MemStoreSettings {
    fn sweep_interval(&self) -> Duration {
        self.sweep_interval
            .unwrap_or_else(|| self.blob_expiration.min(MAX_SWEEP_INTERVAL))
            .max(Duration::from_millis(1))
    }
}

struct StoredEntry {
    blob: Bytes,
    /// `None` when the expiration reaches past what an instant can represent.
    expiry: Option<Instant>,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expiry.is_some_and(|expiry| now > expiry)
    }
}

type Table = Mutex<HashMap<Bytes, StoredEntry>>;

/// Ephemeral store that emulates the EigenDA backend.
///
/// Commitments are real KZG commitments wrapped in a locally issued certificate, so reads go
/// through the same verification as the durable store. Entries live for the configured
/// expiration; they are dropped when read after expiry or by a periodic sweep.
pub struct MemStore {
    verifier: Arc<Verifier>,
    settings: MemStoreSettings,
    table: Arc<Table>,
    next_blob_index: AtomicU32,
    sweeper: CancellationToken,
}

impl MemStore {
    /// Must be called from within a tokio runtime, the sweep runs as a task on it.
    pub fn new(verifier: Arc<Verifier>, settings: MemStoreSettings) -> Self {
        let table = Arc::new(Mutex::new(HashMap::new()));
        let sweeper = CancellationToken::new();
        tokio::spawn(sweep(
            Arc::downgrade(&table),
            settings.sweep_interval(),
            sweeper.clone(),
        ));
        Self {
            verifier,
            settings,
            table,
            next_blob_index: AtomicU32::new(0),
            sweeper,
        }
    }

    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn certificate(&self, commitment: G1Commitment, blob: &[u8]) -> BlobInfo {
        let blob_index = self.next_blob_index.fetch_add(1, Ordering::SeqCst);
        BlobInfo {
            blob_header: BlobHeader {
                commitment,
                data_length: (blob.len() / BYTES_PER_FIELD_ELEMENT) as u32,
            },
            blob_verification_proof: BlobVerificationProof {
                batch_id: 0,
                blob_index,
                batch_header_hash: keccak256(commitment.as_bytes()).to_vec(),
                inclusion_proof: Vec::new(),
                quorum_indexes: Vec::new(),
            },
        }
    }

    fn lookup(&self, key: &[u8]) -> Result<Bytes, StoreError> {
        let now = Instant::now();
        let mut table = self.table.lock();
        let entry = table.get(key).ok_or(StoreError::NotFound)?;
        if entry.is_expired(now) {
            table.remove(key);
            return Err(StoreError::Expired);
        }
        Ok(entry.blob.clone())
    }
}

impl Drop for MemStore {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}

fn remove_expired(table: &Table) -> usize {
    let now = Instant::now();
    let mut table = table.lock();
    let before = table.len();
    table.retain(|_, entry| !entry.is_expired(now));
    before - table.len()
}

async fn sweep(table: Weak<Table>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let Some(table) = table.upgrade() else {
            break;
        };
        let removed = remove_expired(&table);
        if removed > 0 {
            debug!(removed, "Swept expired blobs");
        }
    }
}

#[async_trait::async_trait]
impl Store for MemStore {
    async fn put(
        &self,
        cancel: &CancellationToken,
        data: Bytes,
    ) -> Result<OpCommitment, StoreError> {
        check_blob_length(&data, self.settings.max_blob_length)?;
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let blob = Bytes::from(encode_blob(self.settings.encoding_version, &data)?);
        let verifier = self.verifier.clone();
        let to_commit = blob.clone();
        let kzg_commitment = run_blocking(cancel, move || verifier.commit(&to_commit)).await?;
        let info = self.certificate(kzg_commitment, &blob);
        let commitment: OpCommitment = EigenDaCommitment::from_certificate(&info)
            .map_err(StoreError::Certificate)?
            .into();
        let entry = StoredEntry {
            blob,
            expiry: Instant::now().checked_add(self.settings.blob_expiration),
        };
        self.table.lock().insert(commitment.encode(), entry);
        debug!(
            blob_index = info.blob_verification_proof.blob_index,
            size = data.len(),
            "Blob stored in memory"
        );
        Ok(commitment)
    }

    async fn get(
        &self,
        cancel: &CancellationToken,
        commitment: &OpCommitment,
        domain: Domain,
    ) -> Result<Bytes, StoreError> {
        let info = eigenda_certificate(commitment)?;
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let blob = self.lookup(&commitment.encode())?;
        check_data_length(&info, &blob)?;
        let verifier = self.verifier.clone();
        let expected = *info.commitment();
        let to_verify = blob.clone();
        run_blocking(cancel, move || verifier.verify(&expected, &to_verify)).await?;
        into_domain(blob, domain)
    }
}
