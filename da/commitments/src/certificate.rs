// std
// crates
use serde::{Deserialize, Serialize};
// internal
use crate::bytes_serde::{bytes_array, bytes_vec};
use crate::wire;

pub const G1_COMMITMENT_SIZE: usize = 48;

/// Compressed G1 point a blob was committed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct G1Commitment(#[serde(with = "bytes_array")] pub [u8; G1_COMMITMENT_SIZE]);

impl G1Commitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for G1Commitment {
    type Error = std::array::TryFromSliceError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value.try_into().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHeader {
    pub commitment: G1Commitment,
    /// Blob length in field elements.
    pub data_length: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobVerificationProof {
    pub batch_id: u32,
    pub blob_index: u32,
    #[serde(with = "bytes_vec")]
    pub batch_header_hash: Vec<u8>,
    #[serde(with = "bytes_vec")]
    pub inclusion_proof: Vec<u8>,
    #[serde(with = "bytes_vec")]
    pub quorum_indexes: Vec<u8>,
}

/// Certificate issued by the disperser once a blob is confirmed. Holds everything needed to
/// retrieve the blob again and to check what comes back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobInfo {
    pub blob_header: BlobHeader,
    pub blob_verification_proof: BlobVerificationProof,
}

impl BlobInfo {
    pub fn to_bytes(&self) -> Result<Vec<u8>, wire::Error> {
        wire::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, wire::Error> {
        wire::deserialize(bytes)
    }

    pub fn commitment(&self) -> &G1Commitment {
        &self.blob_header.commitment
    }
}
