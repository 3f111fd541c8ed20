#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{finite_and, Effect};
use crate::{
    context::RenderContext,
    control::{self, ParamReceiver, ParamSender, ParamValue, ParameterMessage},
    dsp::stereo::cancel_center,
    effector::{Effector, Route},
    processor::{bypass, BlockProcessor},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VocalCancelerMessage {
    State(bool),
    Depth(f32),
}

impl ParameterMessage for VocalCancelerMessage {
    const FIELDS: usize = 2;

    fn field(&self) -> usize {
        match self {
            VocalCancelerMessage::State(_) => 0,
            VocalCancelerMessage::Depth(_) => 1,
        }
    }

    fn to_bits(&self) -> u32 {
        match self {
            VocalCancelerMessage::State(state) => u32::from(*state),
            VocalCancelerMessage::Depth(value) => value.to_bits(),
        }
    }

    fn from_bits(field: usize, bits: u32) -> Self {
        match field {
            0 => VocalCancelerMessage::State(bits != 0),
            _ => VocalCancelerMessage::Depth(f32::from_bits(bits)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocalCancelerField {
    State,
    Depth,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VocalCancelerParams {
    pub state: Option<bool>,
    pub depth: Option<f32>,
}

/// Removes centre-panned content from a stereo pair.
pub struct VocalCanceler {
    effector: Effector,
    depth: f32,
    tx: ParamSender<VocalCancelerMessage>,
}

impl VocalCanceler {
    /// Active, with depth 0 (no cancellation).
    pub fn new(ctx: &RenderContext) -> (Self, VocalCancelerProcessor) {
        let (tx, rx) = control::channel();

        let mut canceler = Self {
            effector: Effector::new(false, Route::processor()),
            depth: 0.0,
            tx,
        };
        canceler.activate(ctx);

        let processor = VocalCancelerProcessor {
            rx,
            settings: CancelSettings {
                active: canceler.state(),
                depth: canceler.depth,
            },
        };

        (canceler, processor)
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }
}

impl Effect for VocalCanceler {
    type Params = VocalCancelerParams;
    type Field = VocalCancelerField;

    fn effector(&self) -> &Effector {
        &self.effector
    }

    fn effector_mut(&mut self) -> &mut Effector {
        &mut self.effector
    }

    fn notify_state(&mut self, active: bool) {
        self.tx.send(VocalCancelerMessage::State(active));
    }

    fn get_param(&self, field: VocalCancelerField) -> ParamValue {
        match field {
            VocalCancelerField::State => self.state().into(),
            VocalCancelerField::Depth => self.depth.into(),
        }
    }

    fn set_params(&mut self, params: VocalCancelerParams, ctx: &RenderContext) {
        if let Some(depth) = params.depth {
            if finite_and(depth, |depth| (0.0..=1.0).contains(&depth)) {
                self.depth = depth;
                self.tx.send(VocalCancelerMessage::Depth(depth));
            } else {
                tracing::debug!(depth, "ignoring vocal canceler depth outside [0, 1]");
            }
        }

        if let Some(state) = params.state {
            self.set_state(state, ctx);
        }
    }

    fn params(&self) -> VocalCancelerParams {
        VocalCancelerParams {
            state: Some(self.state()),
            depth: Some(self.depth),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CancelSettings {
    active: bool,
    depth: f32,
}

impl CancelSettings {
    fn apply(&mut self, message: VocalCancelerMessage) {
        match message {
            VocalCancelerMessage::State(active) => self.active = active,
            VocalCancelerMessage::Depth(depth) => self.depth = depth,
        }
    }
}

pub struct VocalCancelerProcessor {
    rx: ParamReceiver<VocalCancelerMessage>,
    settings: CancelSettings,
}

impl VocalCancelerProcessor {
    pub fn depth(&self) -> f32 {
        self.settings.depth
    }
}

impl BlockProcessor for VocalCancelerProcessor {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        _ctx: &RenderContext,
    ) -> bool {
        self.rx.drain(|message| self.settings.apply(message));

        let CancelSettings { active, depth } = self.settings;
        if active && depth > 0.0 {
            if let ([left, right], [out_left, out_right]) = (input, &mut *output) {
                let frames = left.len();
                debug_assert_eq!(right.len(), frames, "stereo channels differ in length");
                debug_assert_eq!(out_left.len(), frames, "output block differs from input");
                debug_assert_eq!(out_right.len(), frames, "output block differs from input");

                if right.len() == frames && out_left.len() == frames && out_right.len() == frames {
                    cancel_center(left, right, out_left, out_right, depth);
                    return true;
                }
            }
        }

        bypass(input, output);
        true
    }
}
