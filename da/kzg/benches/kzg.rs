use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use divan::counter::{BytesCount, ItemsCount};
use divan::{black_box, Bencher};
use once_cell::sync::Lazy;
use rand::RngCore;

use da_kzg::{
    commit_polynomial, common::bytes_to_polynomial_unchecked, global_parameters_from_randomness,
    GlobalParameters,
};

fn main() {
    divan::main()
}

static GLOBAL_PARAMETERS: Lazy<GlobalParameters> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    global_parameters_from_randomness(&mut rng, 4096).unwrap()
});

fn rand_data_elements(elements_count: usize, chunk_size: usize) -> Vec<u8> {
    let mut buff = vec![0u8; elements_count * chunk_size];
    rand::thread_rng().fill_bytes(&mut buff);
    buff
}

const CHUNK_SIZE: usize = 31;

#[allow(non_snake_case)]
#[divan::bench(args = [16, 32, 64, 128, 256, 512, 1024, 2048, 4096])]
fn commit_single_polynomial_with_element_count(bencher: Bencher, element_count: usize) {
    bencher
        .with_inputs(|| {
            let domain = GeneralEvaluationDomain::new(element_count).unwrap();
            let data = rand_data_elements(element_count, CHUNK_SIZE);
            bytes_to_polynomial_unchecked::<CHUNK_SIZE>(&data, domain)
        })
        .input_counter(move |(_evals, _poly)| ItemsCount::new(1usize))
        .bench_refs(|(_evals, poly)| black_box(commit_polynomial(poly, &GLOBAL_PARAMETERS)));
}

#[allow(non_snake_case)]
#[divan::bench(args = [128, 1024, 4096])]
fn interpolate_with_element_count(bencher: Bencher, element_count: usize) {
    bencher
        .with_inputs(|| {
            let domain = GeneralEvaluationDomain::new(element_count).unwrap();
            (rand_data_elements(element_count, CHUNK_SIZE), domain)
        })
        .input_counter(move |(data, _)| BytesCount::new(data.len()))
        .bench_refs(|(data, domain)| {
            black_box(bytes_to_polynomial_unchecked::<CHUNK_SIZE>(data, *domain))
        });
}
