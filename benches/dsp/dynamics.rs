//! Benchmarks for the time-domain effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::dsp::{
    gate::gate_block,
    stereo::{cancel_center, invert_phase},
};

use super::test_block;
use crate::BLOCK_SIZES;

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");

    for &size in BLOCK_SIZES {
        let left = test_block(size);
        let right: Vec<f32> = left.iter().rev().copied().collect();
        let mut out_left = vec![0.0f32; size];
        let mut out_right = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("gate", size), &size, |b, _| {
            b.iter(|| gate_block(black_box(&left), black_box(&mut out_left), 0.1))
        });

        group.bench_with_input(BenchmarkId::new("invert_phase", size), &size, |b, _| {
            b.iter(|| {
                invert_phase(
                    black_box(&left),
                    black_box(&right),
                    black_box(&mut out_left),
                    black_box(&mut out_right),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("cancel_center", size), &size, |b, _| {
            b.iter(|| {
                cancel_center(
                    black_box(&left),
                    black_box(&right),
                    black_box(&mut out_left),
                    black_box(&mut out_right),
                    0.8,
                )
            })
        });
    }

    group.finish();
}
