//! Benchmarks for parameter traffic across the control channel.
//!
//! Models a UI knob being dragged: a new value every block, and a burst of
//! values between blocks that the mailbox has to coalesce.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::{
    effects::{Effect, NoiseSuppressor, NoiseSuppressorParams},
    RenderContext,
};

use super::StereoBlock;
use crate::BLOCK_SIZES;

pub fn bench_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/control");

    for &size in BLOCK_SIZES {
        let ctx = RenderContext::new(48_000.0, size).unwrap();
        let mut block = StereoBlock::new(size);
        let (mut suppressor, mut processor) = NoiseSuppressor::new(&ctx).unwrap();

        let mut step = 0u32;
        group.bench_with_input(BenchmarkId::new("update_per_block", size), &size, |b, _| {
            b.iter(|| {
                step = step.wrapping_add(1);
                let threshold = 0.1 + (step % 16) as f32 * 0.05;
                suppressor.set_params(
                    NoiseSuppressorParams {
                        threshold: Some(threshold),
                        state: None,
                    },
                    &ctx,
                );
                block.run(black_box(&mut processor), &ctx)
            })
        });

        // More sends than the ring holds, then one block
        group.bench_with_input(BenchmarkId::new("burst_of_100", size), &size, |b, _| {
            b.iter(|| {
                for i in 0..100 {
                    suppressor.set_params(
                        NoiseSuppressorParams {
                            threshold: Some(0.1 + i as f32 * 0.01),
                            state: None,
                        },
                        &ctx,
                    );
                }
                block.run(black_box(&mut processor), &ctx)
            })
        });
    }

    group.finish();
}
