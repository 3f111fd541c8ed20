#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Effect;
use crate::{
    context::RenderContext,
    control::{self, ParamReceiver, ParamSender, ParamValue, ParameterMessage},
    dsp::stereo::invert_phase,
    effector::{Effector, Route},
    processor::{bypass, BlockProcessor},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StereoInverterMessage {
    State(bool),
}

impl ParameterMessage for StereoInverterMessage {
    const FIELDS: usize = 1;

    fn field(&self) -> usize {
        0
    }

    fn to_bits(&self) -> u32 {
        let StereoInverterMessage::State(state) = self;
        u32::from(*state)
    }

    fn from_bits(_field: usize, bits: u32) -> Self {
        StereoInverterMessage::State(bits != 0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoInverterField {
    State,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StereoInverterParams {
    pub state: Option<bool>,
}

/// Negates the right channel of a stereo pair. Starts inactive.
pub struct StereoInverter {
    effector: Effector,
    tx: ParamSender<StereoInverterMessage>,
}

impl StereoInverter {
    pub fn new(_ctx: &RenderContext) -> (Self, StereoInverterProcessor) {
        let (tx, rx) = control::channel();

        let inverter = Self {
            effector: Effector::new(false, Route::processor()),
            tx,
        };
        let processor = StereoInverterProcessor {
            rx,
            active: inverter.state(),
        };

        (inverter, processor)
    }
}

impl Effect for StereoInverter {
    type Params = StereoInverterParams;
    type Field = StereoInverterField;

    fn effector(&self) -> &Effector {
        &self.effector
    }

    fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    fn notify_state(&mut self, active: bool) {
        self.tx.send(StereoInverterMessage::State(active));
    }

    fn get_param(&self, field: StereoInverterField) -> ParamValue {
        match field {
            StereoInverterField::State => self.state().into(),
        }
    }

    fn set_params(&mut self, params: StereoInverterParams, ctx: &RenderContext) {
        if let Some(state) = params.state {
            self.set_state(state, ctx);
        }
    }

    fn params(&self) -> StereoInverterParams {
        StereoInverterParams {
            state: Some(self.state()),
        }
    }
}

pub struct StereoInverterProcessor {
    rx: ParamReceiver<StereoInverterMessage>,
    active: bool,
}

impl StereoInverterProcessor {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl BlockProcessor for StereoInverterProcessor {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        _ctx: &RenderContext,
    ) -> bool {
        let active = &mut self.active;
        self.rx.drain(|StereoInverterMessage::State(state)| *active = state);

        if self.active {
            if let ([left, right], [out_left, out_right]) = (input, &mut *output) {
                let frames = left.len();
                debug_assert_eq!(right.len(), frames, "stereo channels differ in length");
                debug_assert_eq!(out_left.len(), frames, "output block differs from input");
                debug_assert_eq!(out_right.len(), frames, "output block differs from input");

                if right.len() == frames && out_left.len() == frames && out_right.len() == frames {
                    invert_phase(left, right, out_left, out_right);
                    return true;
                }
            }
        }

        // Inactive, or not exactly two channels
        bypass(input, output);
        true
    }
}
