use crate::{dsp::spectrum::ComplexSpectrum, error::Result};

/*
Spectral Subtraction
====================

Broadband background noise (hiss, fan hum spread across many bins) shows up
as a low, roughly even floor of magnitude in every bin. Wanted signal sits
well above that floor in a few bins. Subtracting a fixed amount from every
bin magnitude removes the floor and leaves the peaks mostly intact.

Vocabulary
----------

  magnitude   |X[k]| = sqrt(re² + im²). How much energy bin k carries.

  phase       arg X[k] = atan2(im, re). Where in its cycle bin k is.
              Kept untouched: the ear is far more sensitive to magnitude
              changes than to phase, and keeping phase avoids smearing.

  threshold   Amount subtracted from every magnitude. 0 disables the
              effect entirely.


Per Bin
-------

    magnitude = sqrt(re² + im²)
    phase     = atan2(im, re)          (0 when re == im == 0)
    magnitude = max(magnitude - threshold, 0)
    re        = magnitude * cos(phase)
    im        = magnitude * sin(phase)

Bins k and N-k of a real block are complex conjugates, so they get the same
magnitude and opposite phases. Subtracting from both keeps that symmetry,
which is why the inverse transform comes back real.

Every bin magnitude only ever shrinks, and never below zero. By Parseval's
theorem the block's energy therefore never grows as the threshold rises.

The threshold is in raw transform units (bin magnitude of an N-point
transform without normalisation). A full-scale sine lands N/2 in its bin,
so useful thresholds scale with the block size.
*/

/// Scratch state for denoising one channel block at a time.
#[derive(Debug, Clone)]
pub struct SpectralSubtraction {
    spectrum: ComplexSpectrum,
}

impl SpectralSubtraction {
    pub fn new(block_size: usize) -> Result<Self> {
        Ok(Self {
            spectrum: ComplexSpectrum::new(block_size)?,
        })
    }

    pub fn block_size(&self) -> usize {
        self.spectrum.len()
    }

    /// Subtract `threshold` from every bin magnitude of `input` and write
    /// the result to `output`. Both must be exactly `block_size` long.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], threshold: f32) {
        debug_assert_eq!(input.len(), self.spectrum.len());
        debug_assert_eq!(output.len(), self.spectrum.len());
        debug_assert!(threshold >= 0.0);

        self.spectrum.load_real(input);
        self.spectrum.forward();

        let (reals, imags) = self.spectrum.parts_mut();

        for (re, im) in reals.iter_mut().zip(imags.iter_mut()) {
            let magnitude = (*re * *re + *im * *im).sqrt();
            let phase = if *re == 0.0 && *im == 0.0 {
                0.0
            } else {
                im.atan2(*re)
            };

            let magnitude = (magnitude - threshold).max(0.0);

            *re = magnitude * phase.cos();
            *im = magnitude * phase.sin();
        }

        self.spectrum.inverse();
        output.copy_from_slice(self.spectrum.reals());
    }
}
