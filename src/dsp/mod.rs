//! Low-level DSP primitives used by the effects.
//!
//! Everything here is allocation-free once constructed, so the kernels can be
//! called straight from the render thread. The one exception is
//! `automation`, whose scheduling calls allocate and belong on the control
//! thread; its evaluation does not.

/// Host-clock parameter timeline (set value, ramps, targets, curves).
pub mod automation;
/// In-place radix-2 FFT and inverse FFT.
pub mod fft;
/// Per-sample hard noise gate.
pub mod gate;
/// LFO waveform shapes.
pub mod lfo;
/// Bin-remapping pitch shifter.
pub mod pitch;
/// Reusable complex scratch buffers sized for one block.
pub mod spectrum;
/// Left/right sample-pair processing (phase inversion, centre cancel).
pub mod stereo;
/// Spectral-subtraction noise suppressor.
pub mod suppressor;

pub use fft::{fft, ifft, Fft};
pub use spectrum::ComplexSpectrum;
