#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    context::RenderContext,
    control::ParamValue,
    dsp::automation::ParamTimeline,
    error::{Error, Result},
};

/*
Scheduled ADSR Envelope
=======================

A bank of gain stages, one per voice, each driven by an automation timeline
on the render clock. Nothing is computed per sample on the control side:
`start` and `stop` only schedule events, and the gain at any time is read
back from the timeline.

The Shape
---------

    gain
    1.0 ┤    ╱╲
        │   ╱  ╲_
    S   │  ╱     ‾‾‾‾‾‾‾‾‾‾‾╲
        │ ╱                  ╲_
    0.0 ┼╱─────────────────────‾‾‾──→ time
        t0  t1                t3
        │←A→│←── e^(-t/D) ──→│←e^(-t/R)→

  start(t0)   set 0 at t0
              linear ramp to 1, reaching it at t1 = t0 + attack
              approach sustain from t1, time constant = decay

  stop(t)     t3 = max(t - release, now)
              capture the gain at t3, cancel everything from t3 on,
              pin the captured gain at t3, then approach 0 with
              time constant = release

Stopping mid-attack therefore releases from wherever the ramp had reached,
never from a value the voice did not get to.

Exponential approaches never reach zero. A voice counts as silent once its
gain is at or below MIN_GAIN; after about 7 time constants every voice that
started at full scale is there.

Disabled envelopes skip scheduling: `start` pins every voice at 1 and
`stop` pins it at 0.
*/

/// Gain at or below which a voice is considered finished.
pub const MIN_GAIN: f32 = 1e-3;

/// Stepped release used by `stop_with_curve`, spread over the release time.
pub const RELEASE_CURVE: [f32; 4] = [1.0, 0.5, 0.25, 0.0];

const DEFAULT_ATTACK: f32 = 0.01;
const DEFAULT_DECAY: f32 = 0.3;
const DEFAULT_SUSTAIN: f32 = 0.5;
const DEFAULT_RELEASE: f32 = 1.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeField {
    State,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Partial envelope configuration. `None` leaves a field untouched.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvelopeParams {
    pub state: Option<bool>,
    pub attack: Option<f32>,
    pub decay: Option<f32>,
    pub sustain: Option<f32>,
    pub release: Option<f32>,
}

/// One voice's gain stage.
#[derive(Debug, Clone)]
pub struct GainVoice {
    gain: ParamTimeline,
    connected: bool,
}

impl GainVoice {
    fn new() -> Self {
        Self {
            gain: ParamTimeline::new(1.0),
            connected: false,
        }
    }

    pub fn gain(&self) -> &ParamTimeline {
        &self.gain
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

#[derive(Debug, Clone, Copy)]
enum Release {
    Exponential,
    Curve,
}

#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    voices: Vec<Option<GainVoice>>,
    /// Live voices, each index at most once.
    active: Vec<usize>,

    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    enabled: bool,
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeGenerator {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            active: Vec::new(),
            attack: DEFAULT_ATTACK,
            decay: DEFAULT_DECAY,
            sustain: DEFAULT_SUSTAIN,
            release: DEFAULT_RELEASE,
            enabled: true,
        }
    }

    /// Create (or replace) the gain stage for voice `index`.
    pub fn set_generator(&mut self, index: usize) {
        if index >= self.voices.len() {
            self.voices.resize_with(index + 1, || None);
        }
        self.voices[index] = Some(GainVoice::new());
    }

    pub fn generator(&self, index: usize) -> Option<&GainVoice> {
        self.voices.get(index).and_then(Option::as_ref)
    }

    /// Connect voice `index` and mark it live.
    pub fn ready(&mut self, index: usize) -> Result<()> {
        let voice = self
            .voices
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownVoice(index))?;

        voice.connected = true;
        if !self.active.contains(&index) {
            self.active.push(index);
        }
        Ok(())
    }

    /// Number of live voices.
    pub fn live(&self) -> usize {
        self.active.len()
    }

    /// Attack, then decay towards sustain, for every live voice.
    pub fn start(&mut self, t0: f64) {
        let t1 = t0 + self.attack as f64;
        let (sustain, decay, enabled) = (self.sustain, self.decay as f64, self.enabled);

        for gain in self.live_gains() {
            if !enabled {
                gain.set_value(1.0);
                continue;
            }

            gain.cancel_scheduled_values(t0);
            gain.set_value_at_time(0.0, t0);
            gain.linear_ramp_to_value_at_time(1.0, t1);
            gain.set_target_at_time(sustain, t1, decay);
        }
    }

    /// Exponential release ending around `time`.
    pub fn stop(&mut self, time: f64, ctx: &RenderContext) {
        self.schedule_release(time, ctx, Release::Exponential);
    }

    /// Release along `RELEASE_CURVE` instead of an exponential.
    pub fn stop_with_curve(&mut self, time: f64, ctx: &RenderContext) {
        self.schedule_release(time, ctx, Release::Curve);
    }

    fn schedule_release(&mut self, time: f64, ctx: &RenderContext, shape: Release) {
        let release = self.release as f64;
        let t3 = (time - release).max(ctx.current_time);
        let enabled = self.enabled;

        for gain in self.live_gains() {
            if !enabled {
                gain.set_value(0.0);
                continue;
            }

            let reached = gain.value_at(t3);
            gain.cancel_scheduled_values(t3);
            gain.set_value_at_time(reached, t3);

            match shape {
                Release::Exponential => gain.set_target_at_time(0.0, t3, release),
                Release::Curve => gain.set_value_curve_at_time(&RELEASE_CURVE, t3, release),
            }
        }

        tracing::trace!(t3, release, voices = self.active.len(), "envelope released");
    }

    /// True once every live voice has decayed to `MIN_GAIN`. With no live
    /// voices nothing has finished, so this is `false`.
    pub fn paused(&self, ctx: &RenderContext) -> bool {
        if self.active.is_empty() {
            return false;
        }

        self.active.iter().all(|&index| {
            self.generator(index)
                .map_or(true, |voice| voice.gain.value_at(ctx.current_time) <= MIN_GAIN)
        })
    }

    /// Reset every voice to gain 1 and forget which are live.
    pub fn clear(&mut self, disconnect: bool, ctx: &RenderContext) {
        self.active.clear();

        for voice in self.voices.iter_mut().flatten() {
            voice.gain.cancel_scheduled_values(ctx.current_time);
            voice.gain.set_value(1.0);
            if disconnect {
                voice.connected = false;
            }
        }
    }

    /// Gain of voice `index` at `time`.
    pub fn gain(&self, index: usize, time: f64) -> Option<f32> {
        self.generator(index).map(|voice| voice.gain.value_at(time))
    }

    /// Multiply a block by voice `index`'s gain, sample by sample, starting
    /// at the context's current time.
    pub fn apply(&self, index: usize, samples: &mut [f32], ctx: &RenderContext) -> Result<()> {
        let voice = self.generator(index).ok_or(Error::UnknownVoice(index))?;
        let period = 1.0 / ctx.sample_rate as f64;

        for (n, sample) in samples.iter_mut().enumerate() {
            *sample *= voice.gain.value_at(ctx.current_time + n as f64 * period);
        }
        Ok(())
    }

    pub fn get_param(&self, field: EnvelopeField) -> ParamValue {
        match field {
            EnvelopeField::State => self.enabled.into(),
            EnvelopeField::Attack => self.attack.into(),
            EnvelopeField::Decay => self.decay.into(),
            EnvelopeField::Sustain => self.sustain.into(),
            EnvelopeField::Release => self.release.into(),
        }
    }

    /// Apply every valid field. Invalid values are skipped and the previous
    /// value stays in effect.
    pub fn set_params(&mut self, params: EnvelopeParams) {
        if let Some(state) = params.state {
            self.enabled = state;
        }

        let accepted = [
            assign(&mut self.attack, params.attack, is_duration),
            assign(&mut self.decay, params.decay, is_duration),
            assign(&mut self.sustain, params.sustain, |v| {
                v.is_finite() && (0.0..=1.0).contains(&v)
            }),
            assign(&mut self.release, params.release, is_duration),
        ];

        if accepted.contains(&false) {
            tracing::debug!(?params, "ignored out-of-range envelope parameters");
        }
    }

    pub fn params(&self) -> EnvelopeParams {
        EnvelopeParams {
            state: Some(self.enabled),
            attack: Some(self.attack),
            decay: Some(self.decay),
            sustain: Some(self.sustain),
            release: Some(self.release),
        }
    }

    pub fn state(&self) -> bool {
        self.enabled
    }

    pub fn activate(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    pub fn deactivate(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    fn live_gains(&mut self) -> impl Iterator<Item = &mut ParamTimeline> + '_ {
        let voices = &mut self.voices;
        let active = &self.active;

        voices
            .iter_mut()
            .enumerate()
            .filter(move |(index, _)| active.contains(index))
            .filter_map(|(_, voice)| voice.as_mut().map(|voice| &mut voice.gain))
    }
}

fn is_duration(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Store `value` if present and valid. Returns `false` only on rejection.
fn assign(slot: &mut f32, value: Option<f32>, valid: impl Fn(f32) -> bool) -> bool {
    match value {
        Some(value) if valid(value) => {
            *slot = value;
            true
        }
        Some(_) => false,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_with_voices(count: usize) -> EnvelopeGenerator {
        let mut envelope = EnvelopeGenerator::new();
        for index in 0..count {
            envelope.set_generator(index);
            envelope.ready(index).unwrap();
        }
        envelope
    }

    #[test]
    fn attack_decay_sustain_shape() {
        let mut envelope = envelope_with_voices(1);
        envelope.set_params(EnvelopeParams {
            attack: Some(0.1),
            ..Default::default()
        });
        envelope.start(1.0);

        assert_eq!(envelope.gain(0, 1.0), Some(0.0));
        assert!((envelope.gain(0, 1.05).unwrap() - 0.5).abs() < 1e-5);
        assert!((envelope.gain(0, 1.1).unwrap() - 1.0).abs() < 1e-5);
        // Settles on sustain after many decay constants
        assert!((envelope.gain(0, 5.0).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn stop_terminates_after_several_release_constants() {
        let mut envelope = envelope_with_voices(2);
        envelope.set_params(EnvelopeParams {
            release: Some(0.1),
            ..Default::default()
        });
        envelope.start(0.0);

        let now = RenderContext::default().at(0.5);
        envelope.stop(1.0, &now);
        let t3 = 0.9;

        assert!(!envelope.paused(&now.at(t3 + 3.0 * 0.1)));
        assert!(envelope.paused(&now.at(t3 + 7.0 * 0.1)));
    }

    #[test]
    fn release_start_is_clamped_to_now() {
        let mut envelope = envelope_with_voices(1);
        envelope.start(0.0);

        // 0.2 - release(1.0) is in the past
        let now = RenderContext::default().at(2.0);
        let sustained = envelope.gain(0, 2.0).unwrap();
        envelope.stop(0.2, &now);

        assert!((envelope.gain(0, 2.0).unwrap() - sustained).abs() < 1e-6);
        assert!(envelope.gain(0, 3.0).unwrap() < sustained * 0.4);
    }

    #[test]
    fn stopping_mid_attack_releases_from_reached_gain() {
        let mut envelope = envelope_with_voices(1);
        envelope.set_params(EnvelopeParams {
            attack: Some(0.1),
            ..Default::default()
        });
        envelope.start(0.0);

        let now = RenderContext::default().at(0.05);
        envelope.stop(0.0, &now);

        let at_stop = envelope.gain(0, 0.05).unwrap();
        assert!((at_stop - 0.5).abs() < 1e-5);

        // The cancelled ramp would have reached 1.0 here
        let later = envelope.gain(0, 0.1).unwrap();
        assert!(later < at_stop);
        assert!((later - 0.5 * (-0.05f32).exp()).abs() < 1e-4);
    }

    #[test]
    fn curve_release_follows_steps() {
        let mut envelope = envelope_with_voices(1);
        envelope.start(0.0);

        let now = RenderContext::default().at(1.0);
        envelope.stop_with_curve(0.0, &now);

        let third = 1.0 / 3.0;
        assert!((envelope.gain(0, 1.0).unwrap() - 1.0).abs() < 1e-5);
        assert!((envelope.gain(0, 1.0 + third).unwrap() - 0.5).abs() < 1e-4);
        assert_eq!(envelope.gain(0, 2.5), Some(0.0));
        assert!(envelope.paused(&now.at(2.5)));
    }

    #[test]
    fn disabled_envelope_pins_gain() {
        let mut envelope = envelope_with_voices(1);
        envelope.deactivate();
        let ctx = RenderContext::default();

        envelope.start(0.0);
        assert_eq!(envelope.gain(0, 0.0), Some(1.0));
        assert!(!envelope.paused(&ctx));

        envelope.stop(0.0, &ctx);
        assert_eq!(envelope.gain(0, 0.0), Some(0.0));
        assert!(envelope.paused(&ctx));
    }

    #[test]
    fn paused_is_false_without_live_voices() {
        let mut envelope = EnvelopeGenerator::new();
        envelope.set_generator(0);
        assert!(!envelope.paused(&RenderContext::default()));
    }

    #[test]
    fn ready_counts_each_voice_once() {
        let mut envelope = envelope_with_voices(2);
        envelope.ready(1).unwrap();
        envelope.ready(1).unwrap();

        assert_eq!(envelope.live(), 2);
        assert!(envelope.generator(1).unwrap().is_connected());
        assert_eq!(envelope.ready(5), Err(Error::UnknownVoice(5)));
    }

    #[test]
    fn clear_resets_gain_and_live_voices() {
        let mut envelope = envelope_with_voices(2);
        let ctx = RenderContext::default().at(0.5);
        envelope.start(0.0);

        envelope.clear(true, &ctx);

        assert_eq!(envelope.live(), 0);
        for index in 0..2 {
            let voice = envelope.generator(index).unwrap();
            assert_eq!(voice.gain().scheduled(), 0);
            assert_eq!(voice.gain().value_at(0.0), 1.0);
            assert!(!voice.is_connected());
        }
    }

    #[test]
    fn invalid_params_keep_previous_values() {
        let mut envelope = EnvelopeGenerator::new();
        envelope.set_params(EnvelopeParams {
            attack: Some(-1.0),
            decay: Some(0.2),
            sustain: Some(1.5),
            release: Some(f32::NAN),
            state: None,
        });

        let params = envelope.params();
        assert_eq!(params.attack, Some(0.01));
        assert_eq!(params.decay, Some(0.2));
        assert_eq!(params.sustain, Some(0.5));
        assert_eq!(params.release, Some(1.0));
        assert_eq!(envelope.get_param(EnvelopeField::Decay), ParamValue::Number(0.2));
        assert_eq!(envelope.get_param(EnvelopeField::State), ParamValue::Bool(true));
    }

    #[test]
    fn apply_scales_block_by_gain() {
        let mut envelope = envelope_with_voices(1);
        envelope.deactivate();
        let ctx = RenderContext::default();
        envelope.stop(0.0, &ctx);

        let mut block = [0.7; 8];
        envelope.apply(0, &mut block, &ctx).unwrap();
        assert_eq!(block, [0.0; 8]);
        assert!(envelope.apply(3, &mut block, &ctx).is_err());
    }
}
