//! Benchmarks for each effect's render half in its working state.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::{
    effects::{
        Effect, NoiseGate, NoiseGateParams, NoiseSuppressor, NoiseSuppressorParams, PitchShifter,
        PitchShifterParams, StereoInverter, StereoInverterParams, VocalCanceler,
        VocalCancelerParams,
    },
    RenderContext,
};

use super::StereoBlock;
use crate::BLOCK_SIZES;

pub fn bench_processors(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processors");

    for &size in BLOCK_SIZES {
        let ctx = RenderContext::new(48_000.0, size).unwrap();
        let mut block = StereoBlock::new(size);

        let (mut gate, mut gate_proc) = NoiseGate::new(&ctx);
        gate.set_params(
            NoiseGateParams {
                level: Some(0.05),
                state: None,
            },
            &ctx,
        );
        group.bench_with_input(BenchmarkId::new("noise_gate", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut gate_proc), &ctx))
        });

        let (mut suppressor, mut suppressor_proc) = NoiseSuppressor::new(&ctx).unwrap();
        suppressor.set_params(
            NoiseSuppressorParams {
                threshold: Some(0.5),
                state: None,
            },
            &ctx,
        );
        group.bench_with_input(BenchmarkId::new("noise_suppressor", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut suppressor_proc), &ctx))
        });

        let (mut shifter, mut shifter_proc) = PitchShifter::new(&ctx).unwrap();
        shifter.set_params(
            PitchShifterParams {
                state: Some(true),
                pitch: Some(0.75),
            },
            &ctx,
        );
        group.bench_with_input(BenchmarkId::new("pitch_shifter", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut shifter_proc), &ctx))
        });

        let (mut inverter, mut inverter_proc) = StereoInverter::new(&ctx);
        inverter.set_params(StereoInverterParams { state: Some(true) }, &ctx);
        group.bench_with_input(BenchmarkId::new("stereo_inverter", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut inverter_proc), &ctx))
        });

        let (mut canceler, mut canceler_proc) = VocalCanceler::new(&ctx);
        canceler.set_params(
            VocalCancelerParams {
                depth: Some(1.0),
                state: None,
            },
            &ctx,
        );
        group.bench_with_input(BenchmarkId::new("vocal_canceler", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut canceler_proc), &ctx))
        });

        // Bypass baseline: same processor, copy path only
        shifter.deactivate(&ctx);
        group.bench_with_input(BenchmarkId::new("bypass", size), &size, |b, _| {
            b.iter(|| block.run(black_box(&mut shifter_proc), &ctx))
        });
    }

    group.finish();
}
