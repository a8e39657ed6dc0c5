use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::{GlobalParameters, KzgError};
use ark_bls12_381::{fr::Fr, Bls12_381};
use ark_poly::polynomial::univariate::DensePolynomial;
use ark_poly_commit::kzg10::KZG10;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::Rng;

/// Generate a fresh setup holding `srs_order` powers of g.
/// The toxic waste is only dropped, never destroyed in a ceremony, use for development only.
pub fn global_parameters_from_randomness<R: Rng>(
    rng: &mut R,
    srs_order: usize,
) -> Result<GlobalParameters, KzgError> {
    let max_degree = srs_order.saturating_sub(1);
    Ok(KZG10::<Bls12_381, DensePolynomial<Fr>>::setup(
        max_degree, true, rng,
    )?)
}

/// Load a setup previously written with [`global_parameters_to_file`].
/// Points are not subgroup checked, the file is trusted setup material.
pub fn global_parameters_from_file(path: impl AsRef<Path>) -> Result<GlobalParameters, KzgError> {
    let file = BufReader::new(File::open(path)?);
    Ok(GlobalParameters::deserialize_uncompressed_unchecked(file)?)
}

pub fn global_parameters_to_file(
    global_parameters: &GlobalParameters,
    path: impl AsRef<Path>,
) -> Result<(), KzgError> {
    let mut file = BufWriter::new(File::create(path)?);
    global_parameters.serialize_uncompressed(&mut file)?;
    file.flush()?;
    Ok(())
}
