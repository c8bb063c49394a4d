use criterion::{criterion_group, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tessera_shares::{build, random_blob_namespace, Blob, Config};

fn bench_build(c: &mut Criterion) {
    let config = Config::default();
    for n in [10, 100, 1_000] {
        let mut sampler = StdRng::seed_from_u64(0);
        let txs: Vec<Vec<u8>> = (0..n).map(|_| vec![sampler.gen(); 250]).collect();
        let blobs: Vec<Blob> = (0..n)
            .map(|_| {
                let namespace = random_blob_namespace(&mut sampler);
                let data: Vec<u8> = (0..sampler.gen_range(1..2_000)).map(|_| sampler.gen()).collect();
                Blob::new(namespace, data, 0).unwrap()
            })
            .collect();

        c.bench_function(&format!("{}/n={}", module_path!(), n), |b| {
            b.iter_batched(
                || (txs.clone(), blobs.clone()),
                |(txs, blobs)| build(txs, blobs, &config).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_build
}
