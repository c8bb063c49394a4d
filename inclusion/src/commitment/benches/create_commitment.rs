use criterion::{criterion_group, Criterion};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tessera_inclusion::create_commitment;
use tessera_shares::{random_blob_namespace, Blob};

fn bench_create_commitment(c: &mut Criterion) {
    for n in [1_000, 100_000, 1_000_000] {
        let mut sampler = StdRng::seed_from_u64(0);
        let mut data = vec![0u8; n];
        sampler.fill_bytes(&mut data);
        let blob = Blob::new(random_blob_namespace(&mut sampler), data, 0).unwrap();

        c.bench_function(&format!("{}/bytes={}", module_path!(), n), |b| {
            b.iter(|| create_commitment(&blob).unwrap());
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_create_commitment
}
