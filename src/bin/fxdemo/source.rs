//! Test signal: a centred tone with uncorrelated hiss on each side, shaped
//! by an envelope.

use std::f32::consts::TAU;

use effector_dsp::{
    effector::{EnvelopeGenerator, EnvelopeParams},
    RenderContext, Result,
};

const TONE_HZ: f32 = 220.0;
const TONE_LEVEL: f32 = 0.3;
const HISS_LEVEL: f32 = 0.05;

pub struct TestSignal {
    phase: f32,
    seed: u32,
    envelope: EnvelopeGenerator,
}

impl TestSignal {
    /// One note: attack at 0, release ending at `seconds`.
    pub fn new(seconds: f64, ctx: &RenderContext) -> Result<Self> {
        let mut envelope = EnvelopeGenerator::new();
        envelope.set_params(EnvelopeParams {
            attack: Some(0.05),
            decay: Some(0.5),
            sustain: Some(0.8),
            release: Some(1.0),
            state: None,
        });
        envelope.set_generator(0);
        envelope.ready(0)?;
        envelope.start(ctx.current_time);
        envelope.stop(seconds, ctx);

        Ok(Self {
            phase: 0.0,
            seed: 0x9E37_79B9,
            envelope,
        })
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub fn render(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        ctx: &RenderContext,
    ) -> Result<()> {
        let increment = TONE_HZ / ctx.sample_rate;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let tone = TONE_LEVEL * (TAU * self.phase).sin();
            self.phase = (self.phase + increment).fract();

            *l = tone + HISS_LEVEL * self.noise();
            *r = tone + HISS_LEVEL * self.noise();
        }

        self.envelope.apply(0, left, ctx)?;
        self.envelope.apply(0, right, ctx)
    }

    /// White noise in [-1, 1] from a xorshift generator.
    fn noise(&mut self) -> f32 {
        self.seed ^= self.seed << 13;
        self.seed ^= self.seed >> 17;
        self.seed ^= self.seed << 5;
        self.seed as f32 / u32::MAX as f32 * 2.0 - 1.0
    }
}
