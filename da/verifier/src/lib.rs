pub mod codec;

// std
use std::path::{Path, PathBuf};
// crates
use da_commitments::G1Commitment;
use da_kzg::common::is_canonical_field_element;
use da_kzg::{
    bytes_to_polynomial, commit_polynomial, commitment_from_bytes, commitment_to_bytes,
    global_parameters_from_file, global_parameters_from_randomness, global_parameters_to_file,
    GlobalParameters, KzgError, Polynomial, PolynomialEvaluationDomain,
};
use ark_poly::EvaluationDomain;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
// internal
pub use da_kzg::BYTES_PER_FIELD_ELEMENT;
pub use codec::{
    decode_blob, encode_blob, encoded_len, BlobCodecError, EncodingVersion,
    PAYLOAD_BYTES_PER_ELEMENT,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Serialized setup tables. Takes precedence over the cache.
    #[serde(default)]
    pub srs_path: Option<PathBuf>,
    /// Directory generated tables are persisted to and reloaded from.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Number of powers of g, bounds the number of elements a blob can hold.
    pub srs_order: usize,
    /// Threads used while building the setup tables.
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1)
}

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("SRS order must be at least 2, got {0}")]
    InvalidSrsOrder(usize),
    #[error("Failed to build setup worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Kzg(#[from] KzgError),
}

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Blob is empty")]
    EmptyBlob,
    #[error("Blob length {0} is not a multiple of {BYTES_PER_FIELD_ELEMENT}")]
    UnalignedBlob(usize),
    #[error("Blob element {0} is not a canonical field element")]
    NonCanonicalElement(usize),
    #[error("Blob holds {elements} elements, the setup supports at most {max}")]
    BlobTooLarge { elements: usize, max: usize },
    #[error("Commitment is not a valid G1 point: {0}")]
    InvalidCommitment(KzgError),
    #[error("Blob does not match its commitment")]
    CommitmentMismatch,
    #[error("Certificate declares {declared} elements but the blob holds {elements}")]
    DataLengthMismatch { declared: usize, elements: usize },
    #[error(transparent)]
    Kzg(#[from] KzgError),
}

/// Largest number of field elements a blob can hold with `srs_order` powers of g.
/// Blobs are interpolated over power of two domains, so this is the largest power of two that
/// fits the setup.
pub fn max_blob_elements(srs_order: usize) -> usize {
    match srs_order {
        0 => 0,
        order => 1 << (usize::BITS - 1 - order.leading_zeros()),
    }
}

/// Largest payload whose encoded blob still fits a setup of `srs_order` powers.
pub fn max_payload_len(srs_order: usize) -> usize {
    max_blob_elements(srs_order).saturating_sub(1) * PAYLOAD_BYTES_PER_ELEMENT
}

/// Binds blobs to KZG commitments. Holds the setup tables, which are loaded once and read only
/// afterwards.
pub struct Verifier {
    global_parameters: GlobalParameters,
    srs_order: usize,
}

impl Verifier {
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        if config.srs_order < 2 {
            return Err(VerifierError::InvalidSrsOrder(config.srs_order));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers.max(1))
            .thread_name(|i| format!("kzg-setup-{i}"))
            .build()?;
        let global_parameters = pool.install(|| load_global_parameters(config))?;
        let verifier = Self::with_global_parameters(global_parameters)?;
        let available = verifier.srs_order;
        if available < config.srs_order {
            return Err(KzgError::InsufficientPowers {
                required: config.srs_order,
                available,
            }
            .into());
        }
        Ok(Self {
            srs_order: config.srs_order,
            ..verifier
        })
    }

    pub fn with_global_parameters(
        global_parameters: GlobalParameters,
    ) -> Result<Self, VerifierError> {
        let srs_order = global_parameters.powers_of_g.len();
        if srs_order < 2 {
            return Err(VerifierError::InvalidSrsOrder(srs_order));
        }
        Ok(Self {
            global_parameters,
            srs_order,
        })
    }

    pub fn srs_order(&self) -> usize {
        self.srs_order
    }

    pub fn max_blob_elements(&self) -> usize {
        max_blob_elements(self.srs_order)
    }

    /// Commitment of an encoded blob, its elements taken as evaluations over the smallest power
    /// of two domain that holds them.
    pub fn commit(&self, blob: &[u8]) -> Result<G1Commitment, VerificationError> {
        let polynomial = self.blob_polynomial(blob)?;
        let commitment = commit_polynomial(&polynomial, &self.global_parameters)?;
        Ok(G1Commitment(commitment_to_bytes(&commitment)?))
    }

    pub fn verify(&self, commitment: &G1Commitment, blob: &[u8]) -> Result<(), VerificationError> {
        let expected = commitment_from_bytes(commitment.as_bytes())
            .map_err(VerificationError::InvalidCommitment)?;
        let polynomial = self.blob_polynomial(blob)?;
        let computed = commit_polynomial(&polynomial, &self.global_parameters)?;
        if computed != expected {
            return Err(VerificationError::CommitmentMismatch);
        }
        Ok(())
    }

    fn blob_polynomial(&self, blob: &[u8]) -> Result<Polynomial, VerificationError> {
        if blob.is_empty() {
            return Err(VerificationError::EmptyBlob);
        }
        if blob.len() % BYTES_PER_FIELD_ELEMENT != 0 {
            return Err(VerificationError::UnalignedBlob(blob.len()));
        }
        if let Some(index) = blob
            .chunks(BYTES_PER_FIELD_ELEMENT)
            .position(|element| !is_canonical_field_element(element))
        {
            return Err(VerificationError::NonCanonicalElement(index));
        }
        let elements = blob.len() / BYTES_PER_FIELD_ELEMENT;
        let max = self.max_blob_elements();
        if elements > max {
            return Err(VerificationError::BlobTooLarge { elements, max });
        }
        let domain_size = elements.next_power_of_two();
        let domain = PolynomialEvaluationDomain::new(domain_size)
            .ok_or(KzgError::InvalidDomainSize(domain_size))?;
        let (_, polynomial) = bytes_to_polynomial::<BYTES_PER_FIELD_ELEMENT>(blob, domain)?;
        Ok(polynomial)
    }
}

fn cache_file(cache_dir: &Path, srs_order: usize) -> PathBuf {
    cache_dir.join(format!("kzg_srs_{srs_order}.bin"))
}

fn load_global_parameters(config: &VerifierConfig) -> Result<GlobalParameters, KzgError> {
    if let Some(path) = &config.srs_path {
        info!(path = %path.display(), "Loading KZG setup");
        return global_parameters_from_file(path);
    }
    let cached = config
        .cache_dir
        .as_deref()
        .map(|dir| cache_file(dir, config.srs_order));
    if let Some(path) = cached.as_ref().filter(|path| path.exists()) {
        info!(path = %path.display(), "Loading cached KZG setup");
        return global_parameters_from_file(path);
    }
    warn!(
        srs_order = config.srs_order,
        "KZG setup is randomly generated. Use for development only."
    );
    let mut rng = rand::thread_rng();
    let global_parameters = global_parameters_from_randomness(&mut rng, config.srs_order)?;
    if let (Some(dir), Some(path)) = (config.cache_dir.as_deref(), cached) {
        std::fs::create_dir_all(dir)?;
        global_parameters_to_file(&global_parameters, &path)?;
        info!(path = %path.display(), "Stored KZG setup");
    }
    Ok(global_parameters)
}
