//! Error types for effector_dsp.
//!
//! Only construction and control-thread calls can fail. The render path has
//! no error channel: contract violations there are debug assertions.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid transform size: {0}. Must be a non-zero power of two")]
    InvalidTransformSize(usize),

    #[error("Block size {size} exceeds the maximum of {max} frames")]
    BlockTooLarge { size: usize, max: usize },

    #[error("Invalid sample rate: {0}. Must be positive and finite")]
    InvalidSampleRate(f32),

    #[error("Envelope voice {0} has not been created")]
    UnknownVoice(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
