//! Benchmarks for the bcrypt key schedule.
//!
//! Each cost step doubles the number of key expansions, so the reported
//! times should roughly double from one cost to the next.

use std::hint::black_box;

use bcrypt_rs::{BCrypt, LongPasswordStrategy, Version, SALT_LEN};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const BENCH_PASSWORD: &str = "BenchmarkPassword2024";
const BENCH_SALT: [u8; SALT_LEN] = [0x5a; SALT_LEN];

fn bench_cost_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_cost");
    group.sample_size(10);

    for cost in 4..=8u32 {
        let bcrypt = BCrypt::new(cost, Version::TwoB, LongPasswordStrategy::Strict).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(cost), &bcrypt, |b, bcrypt| {
            b.iter(|| {
                bcrypt
                    .hash_with_salt(black_box(BENCH_PASSWORD), &BENCH_SALT)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let bcrypt = BCrypt::new(6, Version::TwoB, LongPasswordStrategy::Strict).unwrap();
    let hash = bcrypt.hash_with_salt(BENCH_PASSWORD, &BENCH_SALT).unwrap();

    c.bench_function("verify_cost_6", |b| {
        b.iter(|| bcrypt.verify(black_box(BENCH_PASSWORD), &hash));
    });
}

criterion_group!(benches, bench_cost_scaling, bench_verify);
criterion_main!(benches);
