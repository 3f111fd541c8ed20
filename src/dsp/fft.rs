use std::f32::consts::PI;

use crate::error::{Error, Result};

/*
Radix-2 FFT / IFFT
==================

Every spectral effect in this crate does the same three things per block:
transform to the frequency domain, edit bins, transform back. This module is
the one shared transform they all compose.

Vocabulary
----------

  bin         One complex value of the spectrum. Bin k of an N-point
              transform sits at k * sample_rate / N Hz.

  butterfly   The 2-point kernel that combines a pair (n, m):
                  x[n] = e + o
                  x[m] = (e - o) * W
              where W is a twiddle factor.

  twiddle     A unit-circle rotation W = cos(w) - i sin(w) with
              w = 2π * r / N. The inverse transform flips the sign of the
              sine term.

  stage       One pass of butterflies over the whole buffer. An N-point
              transform has log2(N) stages.


The Layout
----------

Stage s (1-based) works on groups of 2 * half samples, half = N / 2^s:

    stage 1:  [n ........ n+N/2)                 one group,  half = N/2
    stage 2:  [.. N/4 ..][.. N/4 ..]             two groups, half = N/4
    ...
    stage S:  pairs of neighbours                N/2 groups, half = 1

Inside a group, sample j pairs with j + half and uses twiddle index
r = j * 2^(s-1). The last stage always has r = 0, so its butterflies are a
plain sum/difference.

The butterflies leave the result in bit-reversed order. A final permutation
swaps every index with its bit reversal:

    N = 8:   0 1 2 3 4 5 6 7
             0 4 2 6 1 5 3 7

The reversal table is built one stage at a time instead of reversing every
index from scratch:

    table[0] = 0
    for each stage s, for i in 0..2^(s-1):
        table[2^(s-1) + i] = table[i] + N / 2^s

Realtime Notes
--------------

`Fft::new` allocates the reversal table and the twiddle tables once. After
that, `forward` and `inverse` only read them, so they are safe to call from
the render thread. Buffer lengths are checked with debug assertions only.
*/

/// Precomputed plan for an in-place radix-2 transform of one size.
#[derive(Debug, Clone)]
pub struct Fft {
    size: usize,
    stages: u32,
    reversal: Box<[usize]>,
    cos: Box<[f32]>,
    sin: Box<[f32]>,
}

impl Fft {
    pub fn new(size: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(Error::InvalidTransformSize(size));
        }

        let stages = size.trailing_zeros();
        let half = size / 2;
        let cos = (0..half)
            .map(|r| (2.0 * PI * r as f32 / size as f32).cos())
            .collect();
        let sin = (0..half)
            .map(|r| (2.0 * PI * r as f32 / size as f32).sin())
            .collect();

        Ok(Self {
            size,
            stages,
            reversal: reversal_table(size, stages),
            cos,
            sin,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform, in place.
    pub fn forward(&self, reals: &mut [f32], imags: &mut [f32]) {
        self.butterflies(reals, imags, -1.0);
        self.reorder(reals, imags);
    }

    /// Inverse transform, in place. Output is scaled by `1 / size`.
    pub fn inverse(&self, reals: &mut [f32], imags: &mut [f32]) {
        self.butterflies(reals, imags, 1.0);
        self.reorder(reals, imags);

        let scale = 1.0 / self.size as f32;
        for (re, im) in reals.iter_mut().zip(imags.iter_mut()) {
            *re *= scale;
            *im *= scale;
        }
    }

    fn butterflies(&self, reals: &mut [f32], imags: &mut [f32], sign: f32) {
        debug_assert_eq!(reals.len(), self.size, "real buffer must match transform size");
        debug_assert_eq!(imags.len(), self.size, "imag buffer must match transform size");

        for stage in 1..=self.stages {
            let half = 1usize << (self.stages - stage);
            let groups = 1usize << (stage - 1);

            for group in 0..groups {
                let base = group * (half << 1);

                for j in 0..half {
                    let n = base + j;
                    let m = n + half;

                    let (e_re, e_im) = (reals[n], imags[n]);
                    let (o_re, o_im) = (reals[m], imags[m]);

                    reals[n] = e_re + o_re;
                    imags[n] = e_im + o_im;

                    let d_re = e_re - o_re;
                    let d_im = e_im - o_im;

                    if stage < self.stages {
                        let r = j * groups;
                        let w_re = self.cos[r];
                        let w_im = sign * self.sin[r];

                        reals[m] = (w_re * d_re) - (w_im * d_im);
                        imags[m] = (w_re * d_im) + (w_im * d_re);
                    } else {
                        reals[m] = d_re;
                        imags[m] = d_im;
                    }
                }
            }
        }
    }

    fn reorder(&self, reals: &mut [f32], imags: &mut [f32]) {
        for (k, &target) in self.reversal.iter().enumerate() {
            if target > k {
                reals.swap(k, target);
                imags.swap(k, target);
            }
        }
    }
}

fn reversal_table(size: usize, stages: u32) -> Box<[usize]> {
    let mut table = vec![0usize; size];

    for stage in 1..=stages {
        let filled = 1usize << (stage - 1);
        let step = 1usize << (stages - stage);

        for i in 0..filled {
            table[filled + i] = table[i] + step;
        }
    }

    table.into_boxed_slice()
}

/// One-shot forward transform. Builds a plan, so keep an [`Fft`] around
/// instead when calling from the render thread.
pub fn fft(reals: &mut [f32], imags: &mut [f32]) -> Result<()> {
    Fft::new(reals.len())?.forward(reals, imags);
    Ok(())
}

/// One-shot inverse transform. See [`fft`].
pub fn ifft(reals: &mut [f32], imags: &mut [f32]) -> Result<()> {
    Fft::new(reals.len())?.inverse(reals, imags);
    Ok(())
}
