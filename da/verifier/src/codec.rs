//! Payload to blob codec.
//!
//! A blob is a sequence of 32 byte little endian field elements. Version `0` lays it out as a
//! header element `[version][u32 BE payload length][0; 27]` followed by the payload in 31 byte
//! chunks, each one stored in the low bytes of its element so the top byte stays zero and every
//! element is below the modulus.

// std
// crates
use da_kzg::BYTES_PER_FIELD_ELEMENT;
use serde::{Deserialize, Serialize};
use thiserror::Error;
// internal

pub const PAYLOAD_BYTES_PER_ELEMENT: usize = BYTES_PER_FIELD_ELEMENT - 1;
const HEADER_SIZE: usize = BYTES_PER_FIELD_ELEMENT;
const LENGTH_SIZE: usize = std::mem::size_of::<u32>();

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlobCodecError {
    #[error("Unknown blob encoding version {0}")]
    UnknownVersion(u8),
    #[error("Payload of {0} bytes cannot be described by the blob header")]
    PayloadTooLarge(usize),
    #[error("Blob of {0} bytes is shorter than its header")]
    MissingHeader(usize),
    #[error("Blob length {0} is not a multiple of {BYTES_PER_FIELD_ELEMENT}")]
    Unaligned(usize),
    #[error("Header declares {declared} payload bytes but the blob only holds {available}")]
    LengthMismatch { declared: usize, available: usize },
    #[error("Element {0} has a non zero top byte")]
    NonZeroPadding(usize),
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EncodingVersion {
    #[default]
    V0 = 0,
}

impl TryFrom<u8> for EncodingVersion {
    type Error = BlobCodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            other => Err(BlobCodecError::UnknownVersion(other)),
        }
    }
}

impl From<EncodingVersion> for u8 {
    fn from(value: EncodingVersion) -> Self {
        value as u8
    }
}

/// Size in bytes of the blob a payload of `payload_len` bytes encodes to.
pub fn encoded_len(payload_len: usize) -> usize {
    HEADER_SIZE + payload_len.div_ceil(PAYLOAD_BYTES_PER_ELEMENT) * BYTES_PER_FIELD_ELEMENT
}

pub fn encode_blob(version: EncodingVersion, payload: &[u8]) -> Result<Vec<u8>, BlobCodecError> {
    let declared =
        u32::try_from(payload.len()).map_err(|_| BlobCodecError::PayloadTooLarge(payload.len()))?;
    let mut blob = Vec::with_capacity(encoded_len(payload.len()));
    let mut header = [0u8; HEADER_SIZE];
    header[0] = version.into();
    header[1..1 + LENGTH_SIZE].copy_from_slice(&declared.to_be_bytes());
    blob.extend_from_slice(&header);
    match version {
        EncodingVersion::V0 => {
            for chunk in payload.chunks(PAYLOAD_BYTES_PER_ELEMENT) {
                let mut element = [0u8; BYTES_PER_FIELD_ELEMENT];
                element[..chunk.len()].copy_from_slice(chunk);
                blob.extend_from_slice(&element);
            }
        }
    }
    Ok(blob)
}

/// Recover the payload of a blob. Trailing zero elements appended by the DA layer are ignored.
pub fn decode_blob(blob: &[u8]) -> Result<Vec<u8>, BlobCodecError> {
    if blob.len() < HEADER_SIZE {
        return Err(BlobCodecError::MissingHeader(blob.len()));
    }
    if blob.len() % BYTES_PER_FIELD_ELEMENT != 0 {
        return Err(BlobCodecError::Unaligned(blob.len()));
    }
    let (header, body) = blob.split_at(HEADER_SIZE);
    let version = EncodingVersion::try_from(header[0])?;
    let mut length = [0u8; LENGTH_SIZE];
    length.copy_from_slice(&header[1..1 + LENGTH_SIZE]);
    let declared = u32::from_be_bytes(length) as usize;
    match version {
        EncodingVersion::V0 => {
            let elements = body.len() / BYTES_PER_FIELD_ELEMENT;
            let available = elements * PAYLOAD_BYTES_PER_ELEMENT;
            if declared > available {
                return Err(BlobCodecError::LengthMismatch {
                    declared,
                    available,
                });
            }
            let mut payload = Vec::with_capacity(available);
            for (index, element) in body.chunks(BYTES_PER_FIELD_ELEMENT).enumerate() {
                if element[PAYLOAD_BYTES_PER_ELEMENT] != 0 {
                    return Err(BlobCodecError::NonZeroPadding(index + 1));
                }
                payload.extend_from_slice(&element[..PAYLOAD_BYTES_PER_ELEMENT]);
            }
            payload.truncate(declared);
            Ok(payload)
        }
    }
}
