//! Hard amplitude gate.
//!
//! Samples whose magnitude is at or below `level` are treated as background
//! noise and replaced by silence. Everything louder passes through untouched.
//! There is no attack, hold or release smoothing: the decision is made per
//! sample, so the gate has no state and no latency.

/// Gate a single sample. The comparison is strict: `|sample| == level` is
/// gated.
#[inline]
pub fn gate(sample: f32, level: f32) -> f32 {
    if sample.abs() > level {
        sample
    } else {
        0.0
    }
}

/// Gate a whole block from `input` into `output`.
pub fn gate_block(input: &[f32], output: &mut [f32], level: f32) {
    debug_assert_eq!(input.len(), output.len());

    for (out, &sample) in output.iter_mut().zip(input) {
        *out = gate(sample, level);
    }
}
