//! Low Frequency Oscillator (LFO) waveforms.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio frequencies. Effects use one to
move a parameter back and forth: tremolo moves gain, auto-wah moves a filter
cutoff, chorus moves a delay time.

Vocabulary
----------

  phase       Position inside one cycle, normalised to 0.0..1.0.

  frequency   Cycles per second. LFOs live roughly between 0.01 Hz and
              20 Hz; above that modulation turns into audible sidebands.

  depth       Scale applied to the raw -1.0..+1.0 waveform before it
              reaches the target parameter. The parameter then swings
              `base ± depth`.


Shapes
------

    Sine       smooth sweep                 ∿∿∿∿
    Square     hard switch between ±1       ⊓⊔⊓⊔
    Sawtooth   rise, snap back              ╱╱╱╱
    Triangle   linear up and down           ╱╲╱╲

All shapes are bipolar. Sine, sawtooth and triangle start at 0 and rise;
the sawtooth jumps from +1 to -1 half way through the cycle. Square starts
high.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Evaluate the waveform at a normalised phase in `0.0..1.0`.
    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => {
                // Zero-crossing at phase 0, like the other shapes
                let shifted = phase + 0.5;
                2.0 * (shifted - shifted.floor()) - 1.0
            }
            Waveform::Triangle => {
                let p = phase * 4.0;
                if p < 1.0 {
                    p
                } else if p < 3.0 {
                    2.0 - p
                } else {
                    p - 4.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Normalised phase of an oscillator at `frequency` Hz, `elapsed` seconds
/// after it started.
#[inline]
pub fn phase_at(frequency: f32, elapsed: f64) -> f32 {
    let cycles = frequency as f64 * elapsed.max(0.0);
    (cycles - cycles.floor()) as f32
}
