// std
// crates
use ark_bls12_381::fr::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_poly::domain::general::GeneralEvaluationDomain;
use ark_poly::evaluations::univariate::Evaluations;
use ark_poly::univariate::DensePolynomial;
use num_bigint::BigUint;
use thiserror::Error;
// internal
use crate::{FieldElement, BYTES_PER_FIELD_ELEMENT};

#[derive(Error, Debug)]
pub enum KzgError {
    #[error("Data isn't properly padded, data len must match modulus {expected_modulus} but it is {current_size}")]
    UnpaddedDataError {
        expected_modulus: usize,
        current_size: usize,
    },
    #[error("ChunkSize should be <= 32 (bytes), got {0}")]
    ChunkSizeTooBig(usize),
    #[error("Setup holds {available} powers of g but {required} are required")]
    InsufficientPowers { required: usize, available: usize },
    #[error("Cannot build an evaluation domain of size {0}")]
    InvalidDomainSize(usize),
    #[error(transparent)]
    PolyCommitError(#[from] ark_poly_commit::Error),
    #[error(transparent)]
    SerializationError(#[from] ark_serialize::SerializationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transform chunks of bytes (of size `CHUNK_SIZE`) into `Fr` which are considered evaluations of a
/// polynomial.
pub fn bytes_to_evaluations<const CHUNK_SIZE: usize>(
    data: &[u8],
    domain: GeneralEvaluationDomain<Fr>,
) -> Evaluations<Fr> {
    assert!((data.len() % CHUNK_SIZE).is_zero());
    Evaluations::from_vec_and_domain(
        data.chunks(CHUNK_SIZE)
            .map(
                // use little endian for convenience as shortening 1 byte (<32 supported)
                // do not matter in this endianness
                field_element_from_bytes_le,
            )
            .collect(),
        domain,
    )
}

/// Transform chunks of bytes (of size `CHUNK_SIZE`) into `Fr` which are considered evaluations of a
/// polynomial. Then use FFT to transform that polynomial into coefficient form.
/// `CHUNK_SIZE` needs to be 32 (bytes) or less, otherwise it cannot be encoded.
/// The input data need to be padded, so it fits in a len modulus of `CHUNK_SIZE`.
/// Returns the polynomial in evaluation form and in coefficient form
pub fn bytes_to_polynomial<const CHUNK_SIZE: usize>(
    data: &[u8],
    domain: GeneralEvaluationDomain<Fr>,
) -> Result<(Evaluations<Fr>, DensePolynomial<Fr>), KzgError> {
    if CHUNK_SIZE > BYTES_PER_FIELD_ELEMENT {
        return Err(KzgError::ChunkSizeTooBig(CHUNK_SIZE));
    }
    if data.len() % CHUNK_SIZE != 0 {
        return Err(KzgError::UnpaddedDataError {
            expected_modulus: CHUNK_SIZE,
            current_size: data.len(),
        });
    }
    Ok(bytes_to_polynomial_unchecked::<CHUNK_SIZE>(data, domain))
}

/// Transform chunks of bytes (of size `CHUNK_SIZE`) into `Fr` which are considered evaluations of a
/// polynomial. Then use FFT to transform that polynomial into coefficient form.
/// No extra checks are done for the caller.
/// Caller need to ensure that `CHUNK_SIZE` is not bigger than the underlying `Fr` element can be
/// decoded from.
pub fn bytes_to_polynomial_unchecked<const CHUNK_SIZE: usize>(
    data: &[u8],
    domain: GeneralEvaluationDomain<Fr>,
) -> (Evaluations<Fr>, DensePolynomial<Fr>) {
    let evals = bytes_to_evaluations::<CHUNK_SIZE>(data, domain);
    let coefficients = evals.interpolate_by_ref();
    (evals, coefficients)
}

/// Transform arbitrary bytes into a field element
/// This transformation is bounds unchecked, it's up to the caller to know if
/// data fits within the bls modulus.
/// Data len cannot be higher than `BYTES_PER_FIELD_ELEMENT`
pub fn field_element_from_bytes_le(b: &[u8]) -> FieldElement {
    assert!(b.len() <= BYTES_PER_FIELD_ELEMENT);
    FieldElement::from(BigUint::from_bytes_le(b))
}

/// Whether `b` is the exact little endian encoding of a field element, i.e. it decodes to a value
/// below the modulus and no reduction happens.
pub fn is_canonical_field_element(b: &[u8]) -> bool {
    if b.len() != BYTES_PER_FIELD_ELEMENT {
        return false;
    }
    field_element_from_bytes_le(b).into_bigint().to_bytes_le() == b
}
