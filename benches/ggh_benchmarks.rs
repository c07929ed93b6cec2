//! Benchmarks for key derivation, encryption and decryption

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ggh_lattice::{utils::generate_near_orthogonal_basis, Encryptor, HermiteReducer, LatticeKeyPair};

fn bench_hnf_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("HNF Reduction");

    for size in [4, 6, 8, 10].iter() {
        group.bench_with_input(BenchmarkId::new("HNF", size), size, |b, &size| {
            let lattice = generate_near_orthogonal_basis(size, Some(42)).unwrap();
            let reducer = HermiteReducer::new();

            b.iter(|| black_box(reducer.reduce(black_box(lattice.basis())).unwrap()));
        });
    }

    group.finish();
}

fn bench_encryption(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encryption");

    for size in [4, 6, 8, 10].iter() {
        group.bench_with_input(BenchmarkId::new("encrypt", size), size, |b, &size| {
            let lattice = generate_near_orthogonal_basis(size, Some(7)).unwrap();
            let keys = LatticeKeyPair::new(lattice).unwrap();
            let message: Vec<i64> = (0..size as i64).collect();
            let mut encryptor = Encryptor::seeded(1);

            b.iter(|| black_box(encryptor.encrypt(black_box(&message), keys.public_basis()).unwrap()));
        });
    }

    group.finish();
}

fn bench_decryption(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decryption");

    for size in [4, 6, 8, 10].iter() {
        let lattice = generate_near_orthogonal_basis(*size, Some(7)).unwrap();
        let keys = LatticeKeyPair::new(lattice).unwrap();
        let message: Vec<i64> = (0..*size as i64).collect();
        let ciphertext = Encryptor::seeded(1).encrypt(&message, keys.public_basis()).unwrap();

        group.bench_with_input(BenchmarkId::new("private", size), &ciphertext, |b, c| {
            b.iter(|| black_box(keys.decrypt(black_box(c)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("public", size), &ciphertext, |b, c| {
            b.iter(|| black_box(keys.decrypt_with_public(black_box(c)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hnf_reduction, bench_encryption, bench_decryption);
criterion_main!(benches);
