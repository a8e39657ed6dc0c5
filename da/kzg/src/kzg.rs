use std::borrow::Cow;

use crate::common::KzgError;
use crate::{Commitment, GlobalParameters, Polynomial, COMPRESSED_COMMITMENT_SIZE};
use ark_bls12_381::{Bls12_381, Fr};
use ark_poly::univariate::DensePolynomial;
use ark_poly_commit::kzg10::{Powers, KZG10};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// Commit to a polynomial where each of the evaluations are over `w(i)` for the degree
/// of the polynomial being omega (`w`) the root of unity (2^x).
/// Commitments are never hiding, so the gamma powers of the setup are not needed.
pub fn commit_polynomial(
    polynomial: &Polynomial,
    global_parameters: &GlobalParameters,
) -> Result<Commitment, KzgError> {
    let powers = Powers::<Bls12_381> {
        powers_of_g: Cow::Borrowed(&global_parameters.powers_of_g),
        powers_of_gamma_g: Cow::Owned(vec![]),
    };
    KZG10::<Bls12_381, DensePolynomial<Fr>>::commit(&powers, polynomial, None, None)
        .map_err(KzgError::PolyCommitError)
        .map(|(commitment, _)| commitment)
}

pub fn commitment_to_bytes(
    commitment: &Commitment,
) -> Result<[u8; COMPRESSED_COMMITMENT_SIZE], KzgError> {
    let mut buff = [0u8; COMPRESSED_COMMITMENT_SIZE];
    commitment.serialize_compressed(&mut buff[..])?;
    Ok(buff)
}

/// Decode a compressed commitment. Points off the curve or outside the prime order subgroup are
/// rejected.
pub fn commitment_from_bytes(bytes: &[u8]) -> Result<Commitment, KzgError> {
    Ok(Commitment::deserialize_compressed(bytes)?)
}
