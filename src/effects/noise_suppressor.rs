#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{finite_and, Effect};
use crate::{
    context::RenderContext,
    control::{self, ParamReceiver, ParamSender, ParamValue, ParameterMessage},
    dsp::suppressor::SpectralSubtraction,
    effector::{Effector, Route},
    error::Result,
    processor::{bypass, copy_channel, BlockProcessor},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseSuppressorMessage {
    State(bool),
    Threshold(f32),
}

impl ParameterMessage for NoiseSuppressorMessage {
    const FIELDS: usize = 2;

    fn field(&self) -> usize {
        match self {
            NoiseSuppressorMessage::State(_) => 0,
            NoiseSuppressorMessage::Threshold(_) => 1,
        }
    }

    fn to_bits(&self) -> u32 {
        match self {
            NoiseSuppressorMessage::State(state) => u32::from(*state),
            NoiseSuppressorMessage::Threshold(value) => value.to_bits(),
        }
    }

    fn from_bits(field: usize, bits: u32) -> Self {
        match field {
            0 => NoiseSuppressorMessage::State(bits != 0),
            _ => NoiseSuppressorMessage::Threshold(f32::from_bits(bits)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseSuppressorField {
    State,
    Threshold,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseSuppressorParams {
    pub state: Option<bool>,
    pub threshold: Option<f32>,
}

/// Spectral-subtraction denoiser. Threshold 0 disables it.
pub struct NoiseSuppressor {
    effector: Effector,
    threshold: f32,
    tx: ParamSender<NoiseSuppressorMessage>,
}

impl NoiseSuppressor {
    /// Fails if the context's block size cannot be transformed.
    pub fn new(ctx: &RenderContext) -> Result<(Self, NoiseSuppressorProcessor)> {
        let kernel = SpectralSubtraction::new(ctx.block_size)?;
        let (tx, rx) = control::channel();

        let mut suppressor = Self {
            effector: Effector::new(false, Route::processor()),
            threshold: 0.0,
            tx,
        };
        suppressor.activate(ctx);

        let processor = NoiseSuppressorProcessor {
            rx,
            kernel,
            settings: SuppressorSettings {
                active: suppressor.state(),
                threshold: suppressor.threshold,
            },
        };

        Ok((suppressor, processor))
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Effect for NoiseSuppressor {
    type Params = NoiseSuppressorParams;
    type Field = NoiseSuppressorField;

    fn effector(&self) -> &Effector {
        &self.effector
    }

    fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    fn notify_state(&mut self, active: bool) {
        self.tx.send(NoiseSuppressorMessage::State(active));
    }

    fn get_param(&self, field: NoiseSuppressorField) -> ParamValue {
        match field {
            NoiseSuppressorField::State => self.state().into(),
            NoiseSuppressorField::Threshold => self.threshold.into(),
        }
    }

    fn set_params(&mut self, params: NoiseSuppressorParams, ctx: &RenderContext) {
        if let Some(threshold) = params.threshold {
            if finite_and(threshold, |threshold| threshold >= 0.0) {
                self.threshold = threshold;
                self.tx.send(NoiseSuppressorMessage::Threshold(threshold));
            } else {
                tracing::debug!(threshold, "ignoring invalid suppressor threshold");
            }
        }

        if let Some(state) = params.state {
            self.set_state(state, ctx);
        }
    }

    fn params(&self) -> NoiseSuppressorParams {
        NoiseSuppressorParams {
            state: Some(self.state()),
            threshold: Some(self.threshold),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SuppressorSettings {
    active: bool,
    threshold: f32,
}

impl SuppressorSettings {
    fn apply(&mut self, message: NoiseSuppressorMessage) {
        match message {
            NoiseSuppressorMessage::State(active) => self.active = active,
            NoiseSuppressorMessage::Threshold(threshold) => self.threshold = threshold,
        }
    }
}

/// Render half of [`NoiseSuppressor`]. One scratch spectrum serves every
/// channel in turn.
pub struct NoiseSuppressorProcessor {
    rx: ParamReceiver<NoiseSuppressorMessage>,
    kernel: SpectralSubtraction,
    settings: SuppressorSettings,
}

impl NoiseSuppressorProcessor {
    pub fn is_active(&self) -> bool {
        self.settings.active
    }

    pub fn threshold(&self) -> f32 {
        self.settings.threshold
    }
}

impl BlockProcessor for NoiseSuppressorProcessor {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        _ctx: &RenderContext,
    ) -> bool {
        self.rx.drain(|message| self.settings.apply(message));

        let SuppressorSettings { active, threshold } = self.settings;
        if !active || threshold == 0.0 {
            bypass(input, output);
            return true;
        }

        let size = self.kernel.block_size();
        for (src, dst) in input.iter().zip(output.iter_mut()) {
            debug_assert_eq!(src.len(), size, "block size differs from transform size");
            debug_assert_eq!(dst.len(), size, "block size differs from transform size");

            if src.len() == size && dst.len() == size {
                self.kernel.process(src, dst, threshold);
            } else {
                copy_channel(src, dst);
            }
        }

        true
    }
}
