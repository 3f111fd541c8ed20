//! Benchmarks for automation evaluation.
//!
//! Envelope gain is read from the timeline once per sample, so evaluation
//! cost scales with block size times event count.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use effector_dsp::{effector::EnvelopeGenerator, RenderContext};

use crate::BLOCK_SIZES;

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");
    let ctx = RenderContext::default();

    let mut envelope = EnvelopeGenerator::new();
    envelope.set_generator(0);
    envelope.ready(0).unwrap();
    envelope.start(0.0);
    envelope.stop(2.0, &ctx.at(0.5));

    for &size in BLOCK_SIZES {
        let mut block = vec![0.5f32; size];

        // Mid-decay, all events still ahead of or around the read position
        let decay = ctx.at(0.2);
        group.bench_with_input(BenchmarkId::new("envelope_decay", size), &size, |b, _| {
            b.iter(|| {
                block.fill(0.5);
                envelope.apply(0, black_box(&mut block), black_box(&decay)).unwrap();
            })
        });

        // Release tail, walks the whole event list
        let tail = ctx.at(1.5);
        group.bench_with_input(BenchmarkId::new("envelope_release", size), &size, |b, _| {
            b.iter(|| {
                block.fill(0.5);
                envelope.apply(0, black_box(&mut block), black_box(&tail)).unwrap();
            })
        });
    }

    group.finish();
}
