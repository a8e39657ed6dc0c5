pub mod common;
pub mod global_parameters;
pub mod kzg;

use ark_bls12_381::{Bls12_381, Fr};
use ark_poly::univariate::DensePolynomial;
use ark_poly::GeneralEvaluationDomain;
use ark_poly_commit::kzg10;
use ark_poly_commit::kzg10::UniversalParams;
use std::mem;

pub use common::{bytes_to_evaluations, bytes_to_polynomial, KzgError};
pub use global_parameters::{
    global_parameters_from_file, global_parameters_from_randomness, global_parameters_to_file,
};
pub use kzg::{commit_polynomial, commitment_from_bytes, commitment_to_bytes};

pub type Commitment = kzg10::Commitment<Bls12_381>;
pub type FieldElement = ark_bls12_381::Fr;
pub type Polynomial = DensePolynomial<Fr>;
pub type Evaluations = ark_poly::Evaluations<Fr>;
pub type PolynomialEvaluationDomain = GeneralEvaluationDomain<Fr>;

pub type GlobalParameters = UniversalParams<Bls12_381>;

pub const BYTES_PER_FIELD_ELEMENT: usize = mem::size_of::<Fr>();

/// Size of a compressed G1 point, which is how commitments travel on the wire.
pub const COMPRESSED_COMMITMENT_SIZE: usize = 48;
