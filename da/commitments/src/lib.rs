pub mod bytes_serde;
pub mod certificate;
pub mod da_service;
pub mod wire;

// std
// crates
use bytes::{BufMut, Bytes, BytesMut};
use sha3::{Digest, Keccak256};
use thiserror::Error;
// internal
pub use certificate::{BlobHeader, BlobInfo, BlobVerificationProof, G1Commitment};
pub use da_service::{CertificateVersion, DaLayer, DaServiceCommitment, EigenDaCommitment};

#[derive(Error, Debug, PartialEq)]
pub enum CommitmentError {
    #[error("Commitment is empty, missing type prefix")]
    MissingTypePrefix,
    #[error("Unknown commitment type {0:#04x}")]
    UnknownCommitmentType(u8),
    #[error("DA service commitment is missing its DA layer prefix")]
    MissingDaLayerPrefix,
    #[error("Unknown DA layer {0:#04x}")]
    UnknownDaLayer(u8),
    #[error("EigenDA commitment is missing its certificate version")]
    MissingCertificateVersion,
    #[error("Unknown certificate version {0:#04x}")]
    UnknownCertificateVersion(u8),
    #[error("Invalid hex commitment: {0}")]
    Hex(#[from] const_hex::FromHexError),
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitmentType {
    Keccak256 = 0,
    DaService = 1,
}

impl TryFrom<u8> for CommitmentType {
    type Error = CommitmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Keccak256),
            1 => Ok(Self::DaService),
            other => Err(CommitmentError::UnknownCommitmentType(other)),
        }
    }
}

/// Self describing address of a stored blob: `[type][payload]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpCommitment {
    /// Content hash, payload kept verbatim.
    Keccak256(Bytes),
    DaService(DaServiceCommitment),
}

impl OpCommitment {
    /// Content hash commitment of `data`.
    pub fn keccak256(data: &[u8]) -> Self {
        Self::Keccak256(Bytes::copy_from_slice(&keccak256(data)))
    }

    pub fn commitment_type(&self) -> CommitmentType {
        match self {
            Self::Keccak256(_) => CommitmentType::Keccak256,
            Self::DaService(_) => CommitmentType::DaService,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buff = BytesMut::new();
        buff.put_u8(self.commitment_type() as u8);
        match self {
            Self::Keccak256(hash) => buff.put_slice(hash),
            Self::DaService(commitment) => commitment.encode_into(&mut buff),
        }
        buff.freeze()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let (&head, tail) = bytes
            .split_first()
            .ok_or(CommitmentError::MissingTypePrefix)?;
        match CommitmentType::try_from(head)? {
            CommitmentType::Keccak256 => Ok(Self::Keccak256(Bytes::copy_from_slice(tail))),
            CommitmentType::DaService => DaServiceCommitment::decode(tail).map(Self::DaService),
        }
    }

    pub fn to_hex(&self) -> String {
        const_hex::encode_prefixed(self.encode())
    }

    /// Decode a hex encoded commitment, the `0x` prefix is optional.
    pub fn from_hex(hex: &str) -> Result<Self, CommitmentError> {
        let bytes = const_hex::decode(hex)?;
        Self::decode(&bytes)
    }

    pub fn as_eigenda(&self) -> Option<&EigenDaCommitment> {
        match self {
            Self::DaService(DaServiceCommitment::EigenDa(commitment)) => Some(commitment),
            Self::Keccak256(_) => None,
        }
    }
}

impl TryFrom<&[u8]> for OpCommitment {
    type Error = CommitmentError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

impl From<DaServiceCommitment> for OpCommitment {
    fn from(value: DaServiceCommitment) -> Self {
        Self::DaService(value)
    }
}

impl From<EigenDaCommitment> for OpCommitment {
    fn from(value: EigenDaCommitment) -> Self {
        Self::DaService(value.into())
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}
