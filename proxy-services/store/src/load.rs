// std
use std::sync::Arc;
use std::time::Duration;
// crates
use da_verifier::{
    max_payload_len, BlobCodecError, EncodingVersion, Verifier, VerifierConfig, VerifierError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
// internal
use crate::backends::eigenda::{EigenDaStore, EigenDaStoreSettings};
use crate::backends::memory::{MemStore, MemStoreSettings};
use crate::client::{ClientError, EigenDaClientConfig, HttpDisperserClient};
use crate::{byte_size, Store};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Largest payload accepted by `put`, e.g. `90kib` or `2MiB`.
    #[serde(with = "byte_size")]
    pub max_blob_length: usize,
    #[serde(default)]
    pub put_blob_encoding_version: u8,
    pub verifier: VerifierConfig,
    /// Disperser connection, only required when the memory store is disabled.
    #[serde(default)]
    pub eigenda: Option<EigenDaClientConfig>,
    #[serde(default)]
    pub memstore: MemStoreConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStoreConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(with = "humantime_serde", default = "default_blob_expiration")]
    pub blob_expiration: Duration,
    #[serde(with = "humantime_serde", default)]
    pub sweep_interval: Option<Duration>,
}

impl Default for MemStoreConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            blob_expiration: default_blob_expiration(),
            sweep_interval: None,
        }
    }
}

fn default_blob_expiration() -> Duration {
    Duration::from_secs(14 * 24 * 60 * 60)
}

#[derive(Error, Debug)]
pub enum LoadStoreError {
    #[error(transparent)]
    EncodingVersion(#[from] BlobCodecError),
    #[error("Max blob length of {max_blob_length} bytes needs a larger SRS than order {srs_order} (fits up to {max_payload} bytes)")]
    BlobLengthExceedsSrs {
        max_blob_length: usize,
        srs_order: usize,
        max_payload: usize,
    },
    #[error("Failed to set up the verifier: {0}")]
    Verifier(#[from] VerifierError),
    #[error("Verifier setup task failed: {0}")]
    SetupTask(#[from] tokio::task::JoinError),
    #[error("EigenDA client configuration is required when the memory store is disabled")]
    MissingClientConfig,
    #[error("Failed to build the EigenDA client: {0}")]
    Client(#[from] ClientError),
}

/// Build the store described by `settings`.
///
/// Exactly one backend is constructed. Setup tables are loaded before either of them, on a
/// blocking thread, and any failure aborts construction.
pub async fn load_store(settings: StoreSettings) -> Result<Arc<dyn Store>, LoadStoreError> {
    let encoding_version = EncodingVersion::try_from(settings.put_blob_encoding_version)?;
    let srs_order = settings.verifier.srs_order;
    let max_payload = max_payload_len(srs_order);
    if settings.max_blob_length > max_payload {
        return Err(LoadStoreError::BlobLengthExceedsSrs {
            max_blob_length: settings.max_blob_length,
            srs_order,
            max_payload,
        });
    }

    let verifier_config = settings.verifier.clone();
    let verifier =
        tokio::task::spawn_blocking(move || Verifier::new(&verifier_config)).await??;
    let verifier = Arc::new(verifier);

    if settings.memstore.enabled {
        info!(
            blob_expiration = ?settings.memstore.blob_expiration,
            "Using memstore backend"
        );
        return Ok(Arc::new(MemStore::new(
            verifier,
            MemStoreSettings {
                max_blob_length: settings.max_blob_length,
                encoding_version,
                blob_expiration: settings.memstore.blob_expiration,
                sweep_interval: settings.memstore.sweep_interval,
            },
        )));
    }

    let client_config = settings
        .eigenda
        .ok_or(LoadStoreError::MissingClientConfig)?;
    info!(rpc = %client_config.rpc, "Using eigenda backend");
    let client = HttpDisperserClient::new(&client_config)?;
    Ok(Arc::new(EigenDaStore::new(
        Arc::new(client),
        verifier,
        EigenDaStoreSettings {
            max_blob_length: settings.max_blob_length,
            encoding_version,
            status_query_timeout: client_config.status_query_timeout,
            status_query_retry_interval: client_config.status_query_retry_interval,
        },
    )))
}
