//! Benchmarks for the transform engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::dsp::{fft, ifft, Fft};

use super::test_block;
use crate::BLOCK_SIZES;

pub fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fft");

    for &size in BLOCK_SIZES {
        let signal = test_block(size);
        let mut reals = vec![0.0f32; size];
        let mut imags = vec![0.0f32; size];

        // Planned: tables built once, reused every block
        let plan = Fft::new(size).unwrap();
        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| {
                reals.copy_from_slice(&signal);
                imags.fill(0.0);
                plan.forward(black_box(&mut reals), black_box(&mut imags));
            })
        });

        group.bench_with_input(BenchmarkId::new("round_trip", size), &size, |b, _| {
            b.iter(|| {
                reals.copy_from_slice(&signal);
                imags.fill(0.0);
                plan.forward(&mut reals, &mut imags);
                plan.inverse(black_box(&mut reals), black_box(&mut imags));
            })
        });

        // One-shot: rebuilds the plan each call
        group.bench_with_input(BenchmarkId::new("unplanned", size), &size, |b, _| {
            b.iter(|| {
                reals.copy_from_slice(&signal);
                imags.fill(0.0);
                fft(&mut reals, &mut imags).unwrap();
                ifft(black_box(&mut reals), black_box(&mut imags)).unwrap();
            })
        });
    }

    group.finish();
}
