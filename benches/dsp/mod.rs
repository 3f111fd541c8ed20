//! Benchmarks for low-level DSP kernels.

mod automation;
mod dynamics;
mod fft;
mod spectral;

pub use automation::bench_automation;
pub use dynamics::bench_dynamics;
pub use fft::bench_fft;
pub use spectral::bench_spectral;

use std::f32::consts::TAU;

/// A 440 Hz sine at 48 kHz with a little deterministic hiss.
pub fn test_block(size: usize) -> Vec<f32> {
    let mut seed = 0x2545_F491u32;
    (0..size)
        .map(|n| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let hiss = (seed as f32 / u32::MAX as f32 - 0.5) * 0.05;
            (TAU * 440.0 * n as f32 / 48_000.0).sin() * 0.5 + hiss
        })
        .collect()
}
