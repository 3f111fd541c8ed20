use crate::{dsp::fft::Fft, error::Result};

/// Reusable real/imaginary scratch buffers plus the transform plan that
/// matches their length.
///
/// Allocated once per effect instance, so the render path never allocates.
/// The length is always a power of two: construction fails otherwise.
#[derive(Debug, Clone)]
pub struct ComplexSpectrum {
    fft: Fft,
    reals: Vec<f32>,
    imags: Vec<f32>,
}

impl ComplexSpectrum {
    pub fn new(size: usize) -> Result<Self> {
        let fft = Fft::new(size)?;

        Ok(Self {
            fft,
            reals: vec![0.0; size],
            imags: vec![0.0; size],
        })
    }

    pub fn len(&self) -> usize {
        self.reals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reals.is_empty()
    }

    /// Copy a real block in and zero the imaginary part.
    pub fn load_real(&mut self, samples: &[f32]) {
        debug_assert_eq!(samples.len(), self.len());

        self.reals.copy_from_slice(samples);
        self.imags.fill(0.0);
    }

    /// Zero both halves.
    pub fn clear(&mut self) {
        self.reals.fill(0.0);
        self.imags.fill(0.0);
    }

    pub fn forward(&mut self) {
        self.fft.forward(&mut self.reals, &mut self.imags);
    }

    pub fn inverse(&mut self) {
        self.fft.inverse(&mut self.reals, &mut self.imags);
    }

    pub fn reals(&self) -> &[f32] {
        &self.reals
    }

    pub fn imags(&self) -> &[f32] {
        &self.imags
    }

    /// Both halves at once, for bin-by-bin editing.
    pub fn parts_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.reals, &mut self.imags)
    }

    #[inline]
    pub fn magnitude(&self, bin: usize) -> f32 {
        let re = self.reals[bin];
        let im = self.imags[bin];
        (re * re + im * im).sqrt()
    }
}
