//! Benchmarks for the frequency-domain effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::dsp::{pitch::PitchShift, suppressor::SpectralSubtraction};

use super::test_block;
use crate::BLOCK_SIZES;

pub fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/spectral");

    for &size in BLOCK_SIZES {
        let input = test_block(size);
        let mut output = vec![0.0f32; size];

        let mut shifter = PitchShift::new(size).unwrap();
        group.bench_with_input(BenchmarkId::new("pitch_up_fifth", size), &size, |b, _| {
            b.iter(|| shifter.process(black_box(&input), black_box(&mut output), 1.5))
        });

        let mut suppressor = SpectralSubtraction::new(size).unwrap();
        group.bench_with_input(BenchmarkId::new("suppress", size), &size, |b, _| {
            b.iter(|| suppressor.process(black_box(&input), black_box(&mut output), 0.5))
        });
    }

    group.finish();
}
