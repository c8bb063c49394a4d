use criterion::criterion_main;


criterion_main!(encode::benches, extend::benches);
