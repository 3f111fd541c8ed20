//! Effects built on the lifecycle in [`crate::effector`].
//!
//! Every effect comes in two halves created together:
//!
//! - a control half (`NoiseGate`, `PitchShifter`, ...) that owns the
//!   [`Effector`], validates parameters and sends them over the control
//!   channel
//! - a render half (`NoiseGateProcessor`, ...) implementing
//!   [`BlockProcessor`](crate::processor::BlockProcessor), handed to the
//!   audio thread
//!
//! The halves share nothing but the message ring.

pub mod noise_gate;
pub mod noise_suppressor;
pub mod pitch_shifter;
pub mod stereo;
pub mod vocal_canceler;

use crate::{
    context::RenderContext,
    control::ParamValue,
    effector::{Effector, Endpoint},
};

pub use noise_gate::{NoiseGate, NoiseGateField, NoiseGateParams, NoiseGateProcessor};
pub use noise_suppressor::{
    NoiseSuppressor, NoiseSuppressorField, NoiseSuppressorParams, NoiseSuppressorProcessor,
};
pub use pitch_shifter::{PitchShifter, PitchShifterField, PitchShifterParams, PitchShifterProcessor};
pub use stereo::{StereoInverter, StereoInverterField, StereoInverterParams, StereoInverterProcessor};
pub use vocal_canceler::{
    VocalCanceler, VocalCancelerField, VocalCancelerParams, VocalCancelerProcessor,
};

/// Control-thread interface shared by every effect.
pub trait Effect {
    /// Partial configuration: `None` fields are left untouched.
    type Params;
    /// Names a single parameter for [`Effect::get_param`].
    type Field: Copy;

    fn effector(&self) -> &Effector;
    fn effector_mut(&mut self) -> &mut Effector;

    /// Tell the render half whether to process or bypass.
    fn notify_state(&mut self, active: bool);

    fn get_param(&self, field: Self::Field) -> ParamValue;

    /// Apply every valid field. Out-of-range values are ignored and the
    /// previous value stays in effect.
    fn set_params(&mut self, params: Self::Params, ctx: &RenderContext);

    /// Full snapshot, every field `Some`.
    fn params(&self) -> Self::Params;

    fn state(&self) -> bool {
        self.effector().is_active()
    }

    fn activate(&mut self, ctx: &RenderContext) {
        self.effector_mut().activate(ctx);
        self.notify_state(true);
    }

    fn deactivate(&mut self, ctx: &RenderContext) {
        self.effector_mut().deactivate(ctx);
        self.notify_state(false);
    }

    fn set_state(&mut self, active: bool, ctx: &RenderContext) {
        if active {
            self.activate(ctx);
        } else {
            self.deactivate(ctx);
        }
    }

    fn start(&mut self, time: f64, ctx: &RenderContext) -> bool {
        self.effector_mut().start(time, ctx)
    }

    fn stop(&mut self, time: f64, release: f64, ctx: &RenderContext) -> bool {
        self.effector_mut().stop(time, release, ctx)
    }

    fn input(&self) -> Endpoint {
        self.effector().input()
    }

    fn output(&self) -> Endpoint {
        self.effector().output()
    }
}

/// Rejects NaN and infinities before the range check.
pub(crate) fn finite_and(value: f32, in_range: impl Fn(f32) -> bool) -> bool {
    value.is_finite() && in_range(value)
}
