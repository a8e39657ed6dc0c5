// std
// crates
use bytes::{BufMut, Bytes, BytesMut};
// internal
use crate::certificate::BlobInfo;
use crate::{wire, CommitmentError};

/// DA layers a generic commitment can point to.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaLayer {
    EigenDa = 0,
}

impl TryFrom<u8> for DaLayer {
    type Error = CommitmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::EigenDa),
            other => Err(CommitmentError::UnknownDaLayer(other)),
        }
    }
}

/// Certificate layouts an EigenDA commitment can carry.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertificateVersion {
    V0 = 0,
}

impl TryFrom<u8> for CertificateVersion {
    type Error = CommitmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            other => Err(CommitmentError::UnknownCertificateVersion(other)),
        }
    }
}

/// Commitment issued by a DA service: `[da layer][layer payload]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DaServiceCommitment {
    EigenDa(EigenDaCommitment),
}

/// EigenDA layer payload: `[certificate version][certificate bytes]`.
/// Certificate bytes are kept verbatim, so a commitment always encodes back to what it was
/// decoded from even if its certificate is unreadable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EigenDaCommitment {
    CertV0(Bytes),
}

impl DaServiceCommitment {
    pub fn da_layer(&self) -> DaLayer {
        match self {
            Self::EigenDa(_) => DaLayer::EigenDa,
        }
    }

    pub(crate) fn encode_into(&self, buff: &mut BytesMut) {
        buff.put_u8(self.da_layer() as u8);
        match self {
            Self::EigenDa(commitment) => commitment.encode_into(buff),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let (&head, tail) = bytes
            .split_first()
            .ok_or(CommitmentError::MissingDaLayerPrefix)?;
        match DaLayer::try_from(head)? {
            DaLayer::EigenDa => EigenDaCommitment::decode(tail).map(Self::EigenDa),
        }
    }
}

impl EigenDaCommitment {
    pub fn from_certificate(certificate: &BlobInfo) -> Result<Self, wire::Error> {
        certificate
            .to_bytes()
            .map(|bytes| Self::CertV0(Bytes::from(bytes)))
    }

    pub fn version(&self) -> CertificateVersion {
        match self {
            Self::CertV0(_) => CertificateVersion::V0,
        }
    }

    pub fn certificate(&self) -> Result<BlobInfo, wire::Error> {
        match self {
            Self::CertV0(bytes) => BlobInfo::from_bytes(bytes),
        }
    }

    fn encode_into(&self, buff: &mut BytesMut) {
        buff.put_u8(self.version() as u8);
        match self {
            Self::CertV0(bytes) => buff.put_slice(bytes),
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let (&head, tail) = bytes
            .split_first()
            .ok_or(CommitmentError::MissingCertificateVersion)?;
        match CertificateVersion::try_from(head)? {
            CertificateVersion::V0 => Ok(Self::CertV0(Bytes::copy_from_slice(tail))),
        }
    }
}

impl From<EigenDaCommitment> for DaServiceCommitment {
    fn from(value: EigenDaCommitment) -> Self {
        Self::EigenDa(value)
    }
}
