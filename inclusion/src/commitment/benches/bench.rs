use criterion::criterion_main;

mod create_commitment;

criterion_main!(create_commitment::benches);
