#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{finite_and, Effect};
use crate::{
    context::RenderContext,
    control::{self, ParamReceiver, ParamSender, ParamValue, ParameterMessage},
    dsp::pitch::PitchShift,
    effector::{Effector, Route},
    error::Result,
    processor::{bypass, copy_channel, BlockProcessor},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchShifterMessage {
    State(bool),
    Pitch(f32),
}

impl ParameterMessage for PitchShifterMessage {
    const FIELDS: usize = 2;

    fn field(&self) -> usize {
        match self {
            PitchShifterMessage::State(_) => 0,
            PitchShifterMessage::Pitch(_) => 1,
        }
    }

    fn to_bits(&self) -> u32 {
        match self {
            PitchShifterMessage::State(state) => u32::from(*state),
            PitchShifterMessage::Pitch(value) => value.to_bits(),
        }
    }

    fn from_bits(field: usize, bits: u32) -> Self {
        match field {
            0 => PitchShifterMessage::State(bits != 0),
            _ => PitchShifterMessage::Pitch(f32::from_bits(bits)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchShifterField {
    State,
    Pitch,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchShifterParams {
    pub state: Option<bool>,
    pub pitch: Option<f32>,
}

/// Block-wise pitch shifter. Starts inactive at ratio 1.
pub struct PitchShifter {
    effector: Effector,
    pitch: f32,
    tx: ParamSender<PitchShifterMessage>,
}

impl PitchShifter {
    pub fn new(ctx: &RenderContext) -> Result<(Self, PitchShifterProcessor)> {
        let kernel = PitchShift::new(ctx.block_size)?;
        let (tx, rx) = control::channel();

        let shifter = Self {
            effector: Effector::new(false, Route::processor()),
            pitch: 1.0,
            tx,
        };

        let processor = PitchShifterProcessor {
            rx,
            kernel,
            settings: ShiftSettings {
                active: shifter.state(),
                pitch: shifter.pitch,
            },
        };

        Ok((shifter, processor))
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl Effect for PitchShifter {
    type Params = PitchShifterParams;
    type Field = PitchShifterField;

    fn effector(&self) -> &Effector {
        &self.effector
    }

    fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    fn notify_state(&mut self, active: bool) {
        self.tx.send(PitchShifterMessage::State(active));
    }

    fn get_param(&self, field: PitchShifterField) -> ParamValue {
        match field {
            PitchShifterField::State => self.state().into(),
            PitchShifterField::Pitch => self.pitch.into(),
        }
    }

    fn set_params(&mut self, params: PitchShifterParams, ctx: &RenderContext) {
        if let Some(pitch) = params.pitch {
            if finite_and(pitch, |pitch| pitch > 0.0) {
                self.pitch = pitch;
                self.tx.send(PitchShifterMessage::Pitch(pitch));
            } else {
                tracing::debug!(pitch, "ignoring non-positive pitch ratio");
            }
        }

        if let Some(state) = params.state {
            self.set_state(state, ctx);
        }
    }

    fn params(&self) -> PitchShifterParams {
        PitchShifterParams {
            state: Some(self.state()),
            pitch: Some(self.pitch),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ShiftSettings {
    active: bool,
    pitch: f32,
}

impl ShiftSettings {
    fn apply(&mut self, message: PitchShifterMessage) {
        match message {
            PitchShifterMessage::State(active) => self.active = active,
            PitchShifterMessage::Pitch(pitch) => self.pitch = pitch,
        }
    }
}

pub struct PitchShifterProcessor {
    rx: ParamReceiver<PitchShifterMessage>,
    kernel: PitchShift,
    settings: ShiftSettings,
}

impl PitchShifterProcessor {
    pub fn is_active(&self) -> bool {
        self.settings.active
    }

    pub fn pitch(&self) -> f32 {
        self.settings.pitch
    }
}

impl BlockProcessor for PitchShifterProcessor {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        _ctx: &RenderContext,
    ) -> bool {
        self.rx.drain(|message| self.settings.apply(message));

        let ShiftSettings { active, pitch } = self.settings;
        if !active || pitch == 1.0 {
            bypass(input, output);
            return true;
        }

        let size = self.kernel.block_size();
        for (src, dst) in input.iter().zip(output.iter_mut()) {
            debug_assert_eq!(src.len(), size, "block size differs from transform size");
            debug_assert_eq!(dst.len(), size, "block size differs from transform size");

            if src.len() == size && dst.len() == size {
                self.kernel.process(src, dst, pitch);
            } else {
                copy_channel(src, dst);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_at_bin(bin: usize, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * PI * bin as f32 * n as f32 / len as f32).sin())
            .collect()
    }

    fn render_stereo(
        processor: &mut PitchShifterProcessor,
        left: &[f32],
        right: &[f32],
    ) -> (Vec<f32>, Vec<f32>) {
        let mut out_left = vec![0.0; left.len()];
        let mut out_right = vec![0.0; right.len()];
        {
            let input: [&[f32]; 2] = [left, right];
            let mut output: [&mut [f32]; 2] = [&mut out_left, &mut out_right];
            processor.process(&input, &mut output, &RenderContext::default());
        }
        (out_left, out_right)
    }

    #[test]
    fn starts_inactive_at_unity() {
        let ctx = RenderContext::default();
        let (shifter, processor) = PitchShifter::new(&ctx).unwrap();

        assert!(!shifter.state());
        assert_eq!(shifter.params(), PitchShifterParams { state: Some(false), pitch: Some(1.0) });
        assert!(!processor.is_active());
    }

    #[test]
    fn unity_pitch_is_exact_bypass_when_active() {
        let ctx = RenderContext::default();
        let (mut shifter, mut processor) = PitchShifter::new(&ctx).unwrap();
        shifter.activate(&ctx);

        let left = sine_at_bin(5, ctx.block_size);
        let right = sine_at_bin(9, ctx.block_size);
        let (out_left, out_right) = render_stereo(&mut processor, &left, &right);

        assert!(processor.is_active());
        assert_eq!(out_left, left);
        assert_eq!(out_right, right);
    }

    #[test]
    fn octave_up_moves_energy_to_double_bin() {
        let ctx = RenderContext::default();
        let (mut shifter, mut processor) = PitchShifter::new(&ctx).unwrap();
        shifter.set_params(
            PitchShifterParams {
                state: Some(true),
                pitch: Some(2.0),
            },
            &ctx,
        );

        let input = sine_at_bin(4, ctx.block_size);
        let (shifted, _) = render_stereo(&mut processor, &input, &input);
        let expected = sine_at_bin(8, ctx.block_size);

        for (got, want) in shifted.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-3, "{got} != {want}");
        }
    }

    #[test]
    fn non_positive_pitch_is_ignored() {
        let ctx = RenderContext::default();
        let (mut shifter, _processor) = PitchShifter::new(&ctx).unwrap();

        for pitch in [0.0, -2.0, f32::INFINITY] {
            shifter.set_params(
                PitchShifterParams {
                    pitch: Some(pitch),
                    state: None,
                },
                &ctx,
            );
        }

        assert_eq!(shifter.get_param(PitchShifterField::Pitch), ParamValue::Number(1.0));
    }
}
