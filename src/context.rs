use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    MAX_BLOCK_SIZE, RENDER_QUANTUM,
};

/// Context passed to effects at construction and on every render call
///
/// Contains what an effect needs to know about the host graph:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - block_size: Frames per render quantum (power of two)
/// - current_time: Render clock in seconds at the start of the block
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub sample_rate: f32,
    pub block_size: usize,
    pub current_time: f64,
}

impl RenderContext {
    pub fn new(sample_rate: f32, block_size: usize) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if !block_size.is_power_of_two() {
            return Err(Error::InvalidTransformSize(block_size));
        }
        if block_size > MAX_BLOCK_SIZE {
            return Err(Error::BlockTooLarge {
                size: block_size,
                max: MAX_BLOCK_SIZE,
            });
        }

        Ok(Self {
            sample_rate,
            block_size,
            current_time: 0.0,
        })
    }

    /// Same context with the clock moved to `time` seconds.
    pub fn at(self, time: f64) -> Self {
        Self {
            current_time: time,
            ..self
        }
    }

    /// Duration of one block in seconds.
    pub fn block_duration(&self) -> f64 {
        self.block_size as f64 / self.sample_rate as f64
    }

    /// Move the clock forward by one block.
    pub fn advance(&mut self) {
        self.current_time += self.block_duration();
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: RENDER_QUANTUM,
            current_time: 0.0,
        }
    }
}

/// Render clock shared between the audio thread and the control thread.
///
/// The render thread is the only writer: it bumps the frame counter once per
/// block. The control thread reads it to clamp scheduling times to "now".
#[derive(Debug, Clone)]
pub struct SharedClock {
    frames: Arc<AtomicU64>,
    base: RenderContext,
}

impl SharedClock {
    pub fn new(base: RenderContext) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            base,
        }
    }

    /// Called by the render thread after each processed block.
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Release);
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.base.sample_rate as f64
    }

    /// Snapshot of the render context at the current clock position.
    pub fn context(&self) -> RenderContext {
        self.base.at(self.now())
    }
}
