use criterion::criterion_main;

mod build;

criterion_main!(build::benches, split::benches);
