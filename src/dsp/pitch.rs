use crate::{dsp::spectrum::ComplexSpectrum, error::Result};

/*
Spectral Pitch Shifting
=======================

The simplest frequency-domain pitch shifter: move every bin to a new bin
index proportional to the pitch ratio, then transform back.

Vocabulary
----------

  pitch       Frequency ratio. 2.0 = one octave up, 0.5 = one octave down,
              1.0 = unchanged.

  offset      Destination bin for source bin i: floor(pitch * i).

  eq          Per-bin weight. 1 for the lower half of the spectrum
              (bins 0..=N/2), 0 above it. The upper half is the mirror
              image of the lower half for real input; moving it as well
              would fold aliased energy back into the audible band.

  gain        Fixed correction of 2. Dropping the mirrored half throws
              away half the energy; doubling the remaining bins makes up
              for it.


The Remap
---------

    input bins:   0  1  2  3  4  5  6  7 | 8 ... (mirror, eq = 0)
    pitch = 1.5:  0  1  3  4  6  7  9 10
                        ^     ^     ^
                        bins 2, 5, 8 stay empty

    pitch = 0.5:  0  0  1  1  2  2  3  3
                  ^^^^  ^^^^
                  two source bins accumulate into one destination

Because the result only has content in the lower half, its inverse
transform is complex. The real part is the shifted signal: it equals the
real signal that has the same lower-half spectrum, with the gain of 2
restoring the missing mirror.

This is block-local: there is no phase vocoder and no overlap-add, so
shifted output has audible block-rate artefacts. That is the trade for
zero latency beyond one block.

pitch == 1 never reaches this code. The effect copies input to output so
the unity setting is bit-exact and costs nothing.
*/

pub const GAIN_CORRECTION: f32 = 2.0;

/// Scratch state for shifting one channel block at a time.
#[derive(Debug, Clone)]
pub struct PitchShift {
    analysis: ComplexSpectrum,
    synthesis: ComplexSpectrum,
}

impl PitchShift {
    pub fn new(block_size: usize) -> Result<Self> {
        Ok(Self {
            analysis: ComplexSpectrum::new(block_size)?,
            synthesis: ComplexSpectrum::new(block_size)?,
        })
    }

    pub fn block_size(&self) -> usize {
        self.analysis.len()
    }

    /// Shift one block of samples by `pitch`. `input` and `output` must be
    /// exactly `block_size` long.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], pitch: f32) {
        let size = self.analysis.len();
        debug_assert_eq!(input.len(), size);
        debug_assert_eq!(output.len(), size);
        debug_assert!(pitch > 0.0);

        self.analysis.load_real(input);
        self.analysis.forward();
        self.synthesis.clear();

        let half = size / 2;
        let source_re = self.analysis.reals();
        let source_im = self.analysis.imags();
        let (dest_re, dest_im) = self.synthesis.parts_mut();

        for bin in 0..=half.min(size - 1) {
            let offset = (pitch * bin as f32).floor() as usize;
            if offset >= size {
                // Higher source bins only map further out
                break;
            }

            dest_re[offset] += GAIN_CORRECTION * source_re[bin];
            dest_im[offset] += GAIN_CORRECTION * source_im[bin];
        }

        self.synthesis.inverse();
        output.copy_from_slice(self.synthesis.reals());
    }
}
