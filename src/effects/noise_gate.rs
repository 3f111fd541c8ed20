#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{finite_and, Effect};
use crate::{
    context::RenderContext,
    control::{self, ParamReceiver, ParamSender, ParamValue, ParameterMessage},
    dsp::gate::gate_block,
    effector::{Effector, Route},
    processor::{bypass, copy_channel, BlockProcessor},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseGateMessage {
    State(bool),
    Level(f32),
}

impl ParameterMessage for NoiseGateMessage {
    const FIELDS: usize = 2;

    fn field(&self) -> usize {
        match self {
            NoiseGateMessage::State(_) => 0,
            NoiseGateMessage::Level(_) => 1,
        }
    }

    fn to_bits(&self) -> u32 {
        match self {
            NoiseGateMessage::State(state) => u32::from(*state),
            NoiseGateMessage::Level(value) => value.to_bits(),
        }
    }

    fn from_bits(field: usize, bits: u32) -> Self {
        match field {
            0 => NoiseGateMessage::State(bits != 0),
            _ => NoiseGateMessage::Level(f32::from_bits(bits)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseGateField {
    State,
    Level,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseGateParams {
    pub state: Option<bool>,
    pub level: Option<f32>,
}

/// Hard gate: samples at or below `level` become silence.
pub struct NoiseGate {
    effector: Effector,
    level: f32,
    tx: ParamSender<NoiseGateMessage>,
}

impl NoiseGate {
    /// Active, with level 0 (which passes everything).
    pub fn new(ctx: &RenderContext) -> (Self, NoiseGateProcessor) {
        let (tx, rx) = control::channel();

        let mut gate = Self {
            effector: Effector::new(false, Route::processor()),
            level: 0.0,
            tx,
        };
        gate.activate(ctx);

        let processor = NoiseGateProcessor {
            rx,
            settings: GateSettings {
                active: gate.state(),
                level: gate.level,
            },
        };

        (gate, processor)
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Effect for NoiseGate {
    type Params = NoiseGateParams;
    type Field = NoiseGateField;

    fn effector(&self) -> &Effector {
        &self.effector
    }

    fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    fn notify_state(&mut self, active: bool) {
        self.tx.send(NoiseGateMessage::State(active));
    }

    fn get_param(&self, field: NoiseGateField) -> ParamValue {
        match field {
            NoiseGateField::State => self.state().into(),
            NoiseGateField::Level => self.level.into(),
        }
    }

    fn set_params(&mut self, params: NoiseGateParams, ctx: &RenderContext) {
        if let Some(level) = params.level {
            if finite_and(level, |level| level >= 0.0) {
                self.level = level;
                self.tx.send(NoiseGateMessage::Level(level));
            } else {
                tracing::debug!(level, "ignoring invalid noise gate level");
            }
        }

        if let Some(state) = params.state {
            self.set_state(state, ctx);
        }
    }

    fn params(&self) -> NoiseGateParams {
        NoiseGateParams {
            state: Some(self.state()),
            level: Some(self.level),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GateSettings {
    active: bool,
    level: f32,
}

impl GateSettings {
    fn apply(&mut self, message: NoiseGateMessage) {
        match message {
            NoiseGateMessage::State(active) => self.active = active,
            NoiseGateMessage::Level(level) => self.level = level,
        }
    }
}

/// Render half of [`NoiseGate`].
pub struct NoiseGateProcessor {
    rx: ParamReceiver<NoiseGateMessage>,
    settings: GateSettings,
}

impl NoiseGateProcessor {
    pub fn is_active(&self) -> bool {
        self.settings.active
    }

    pub fn level(&self) -> f32 {
        self.settings.level
    }
}

impl BlockProcessor for NoiseGateProcessor {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        _ctx: &RenderContext,
    ) -> bool {
        self.rx.drain(|message| self.settings.apply(message));

        let GateSettings { active, level } = self.settings;
        if !active || level == 0.0 {
            bypass(input, output);
            return true;
        }

        for (src, dst) in input.iter().zip(output.iter_mut()) {
            if src.len() == dst.len() {
                gate_block(src, dst, level);
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

    fn render(
        processor: &mut NoiseGateProcessor,
        left: &[f32],
        right: &[f32],
    ) -> (Vec<f32>, Vec<f32>) {
        let mut out_left = vec![0.0; left.len()];
        let mut out_right = vec![0.0; right.len()];
        {
            let input: [&[f32]; 2] = [left, right];
            let mut output: [&mut [f32]; 2] = [&mut out_left, &mut out_right];
            assert!(processor.process(&input, &mut output, &RenderContext::default()));
        }
        (out_left, out_right)
    }

    #[test]
    fn defaults_to_active_with_zero_level() {
        let ctx = RenderContext::default();
        let (gate, processor) = NoiseGate::new(&ctx);

        assert!(gate.state());
        assert_eq!(gate.get_param(NoiseGateField::Level), ParamValue::Number(0.0));
        assert!(processor.is_active());
    }

    #[test]
    fn zero_level_is_exact_bypass() {
        let ctx = RenderContext::default();
        let (_gate, mut processor) = NoiseGate::new(&ctx);

        let left = [-0.0, 0.1, -0.2, 0.0];
        let right = [0.5, -0.5, 0.25, -0.0];
        let (out_left, out_right) = render(&mut processor, &left, &right);

        // Gating at 0 would turn -0.0 into +0.0; bypass keeps the bits
        let bits = |block: &[f32]| block.iter().map(|s| s.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&out_left), bits(&left));
        assert_eq!(bits(&out_right), bits(&right));
    }

    #[test]
    fn level_update_reaches_render_half() {
        let ctx = RenderContext::default();
        let (mut gate, mut processor) = NoiseGate::new(&ctx);

        gate.set_params(
            NoiseGateParams {
                level: Some(0.2),
                ..Default::default()
            },
            &ctx,
        );

        let (out_left, out_right) = render(&mut processor, &[0.1, 0.2, 0.3, -0.5], &[-0.21; 4]);

        assert_eq!(processor.level(), 0.2);
        assert_eq!(out_left, vec![0.0, 0.0, 0.3, -0.5]);
        assert_eq!(out_right, vec![-0.21; 4]);
    }

    #[test]
    fn invalid_level_keeps_previous_value() {
        let ctx = RenderContext::default();
        let (mut gate, mut processor) = NoiseGate::new(&ctx);

        gate.set_params(NoiseGateParams { level: Some(0.3), state: None }, &ctx);
        gate.set_params(NoiseGateParams { level: Some(-1.0), state: None }, &ctx);
        gate.set_params(NoiseGateParams { level: Some(f32::NAN), state: None }, &ctx);

        assert_eq!(gate.level(), 0.3);
        render(&mut processor, &[0.0], &[0.0]);
        assert_eq!(processor.level(), 0.3);
    }

    #[test]
    fn deactivated_gate_passes_everything() {
        let ctx = RenderContext::default();
        let (mut gate, mut processor) = NoiseGate::new(&ctx);

        gate.set_params(
            NoiseGateParams {
                state: Some(false),
                level: Some(1.0),
            },
            &ctx,
        );

        let (out_left, _) = render(&mut processor, &[0.1, -0.2], &[0.0, 0.0]);
        assert_eq!(out_left, vec![0.1, -0.2]);
        assert_eq!(gate.params(), NoiseGateParams { state: Some(false), level: Some(1.0) });
    }
}
