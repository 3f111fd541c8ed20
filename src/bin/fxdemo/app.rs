//! FxDemo - wires one effect between the test signal and the sound card

use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use color_eyre::eyre::{eyre, Report, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use effector_dsp::{
    effects::{
        Effect, NoiseGate, NoiseGateParams, NoiseSuppressor, NoiseSuppressorParams, PitchShifter,
        PitchShifterParams, StereoInverter, StereoInverterParams, VocalCanceler,
        VocalCancelerParams,
    },
    BlockProcessor, RenderContext, SharedClock, RENDER_QUANTUM,
};

use super::source::TestSignal;

/// How often the control thread moves the parameters.
const CONTROL_STEP: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Gate,
    Suppressor,
    Pitch,
    Stereo,
    Canceler,
}

impl FromStr for EffectKind {
    type Err = Report;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "gate" => Ok(EffectKind::Gate),
            "suppressor" => Ok(EffectKind::Suppressor),
            "pitch" => Ok(EffectKind::Pitch),
            "stereo" => Ok(EffectKind::Stereo),
            "canceler" => Ok(EffectKind::Canceler),
            other => Err(eyre!(
                "unknown effect '{other}', expected gate|suppressor|pitch|stereo|canceler"
            )),
        }
    }
}

/// Control half of whichever effect is playing.
enum Controls {
    Gate(NoiseGate),
    Suppressor(NoiseSuppressor),
    Pitch(PitchShifter),
    Stereo(StereoInverter),
    Canceler(VocalCanceler),
}

impl Controls {
    fn build(kind: EffectKind, ctx: &RenderContext) -> EyreResult<(Self, Box<dyn BlockProcessor>)> {
        Ok(match kind {
            EffectKind::Gate => {
                let (control, processor) = NoiseGate::new(ctx);
                (Controls::Gate(control), Box::new(processor))
            }
            EffectKind::Suppressor => {
                let (control, processor) = NoiseSuppressor::new(ctx)?;
                (Controls::Suppressor(control), Box::new(processor))
            }
            EffectKind::Pitch => {
                let (mut control, processor) = PitchShifter::new(ctx)?;
                control.activate(ctx);
                (Controls::Pitch(control), Box::new(processor))
            }
            EffectKind::Stereo => {
                let (control, processor) = StereoInverter::new(ctx);
                (Controls::Stereo(control), Box::new(processor))
            }
            EffectKind::Canceler => {
                let (control, processor) = VocalCanceler::new(ctx);
                (Controls::Canceler(control), Box::new(processor))
            }
        })
    }

    /// Move the effect's main parameter along a slow triangle sweep.
    fn sweep(&mut self, progress: f32, ctx: &RenderContext) {
        // 0 -> 1 -> 0 over the whole demo
        let tri = 1.0 - (2.0 * progress - 1.0).abs();

        match self {
            Controls::Gate(gate) => {
                let level = 0.4 * tri;
                gate.set_params(NoiseGateParams { level: Some(level), state: None }, ctx);
                tracing::info!(level, "noise gate");
            }
            Controls::Suppressor(suppressor) => {
                let threshold = 4.0 * tri;
                suppressor.set_params(
                    NoiseSuppressorParams { threshold: Some(threshold), state: None },
                    ctx,
                );
                tracing::info!(threshold, "noise suppressor");
            }
            Controls::Pitch(shifter) => {
                let pitch = 0.5 + 1.5 * tri;
                shifter.set_params(PitchShifterParams { pitch: Some(pitch), state: None }, ctx);
                tracing::info!(pitch, "pitch shifter");
            }
            Controls::Stereo(inverter) => {
                // Flip every second
                let state = (progress * 8.0) as u32 % 2 == 1;
                if state != inverter.state() {
                    inverter.set_params(StereoInverterParams { state: Some(state) }, ctx);
                    tracing::info!(state, "stereo phase inverter");
                }
            }
            Controls::Canceler(canceler) => {
                let depth = tri;
                canceler.set_params(VocalCancelerParams { depth: Some(depth), state: None }, ctx);
                tracing::info!(depth, "vocal canceler");
            }
        }
    }

    fn stop(&mut self, ctx: &RenderContext) {
        match self {
            Controls::Gate(effect) => effect.deactivate(ctx),
            Controls::Suppressor(effect) => effect.deactivate(ctx),
            Controls::Pitch(effect) => effect.deactivate(ctx),
            Controls::Stereo(effect) => effect.deactivate(ctx),
            Controls::Canceler(effect) => effect.deactivate(ctx),
        }
    }
}

/// Demo builder
pub struct FxDemo {
    kind: EffectKind,
    seconds: f64,
}

impl FxDemo {
    pub fn new(kind: EffectKind) -> Self {
        Self { kind, seconds: 8.0 }
    }

    /// Length of the note, release included
    pub fn seconds(mut self, seconds: f64) -> Self {
        self.seconds = seconds;
        self
    }

    /// Run the demo (blocks until the note has faded out)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let ctx = RenderContext::new(sample_rate, RENDER_QUANTUM)?;
        let clock = SharedClock::new(ctx);

        tracing::info!(
            effect = ?self.kind,
            sample_rate,
            channels,
            seconds = self.seconds,
            "starting fxdemo"
        );

        let (mut controls, processor) = Controls::build(self.kind, &ctx)?;
        let signal = TestSignal::new(self.seconds, &ctx)?;
        let finished = Arc::new(AtomicBool::new(false));

        let mut renderer = Renderer::new(processor, signal, clock.clone(), finished.clone());

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| renderer.fill(data, channels),
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        while !finished.load(Ordering::Acquire) {
            let now = clock.context();
            let progress = (now.current_time / self.seconds).clamp(0.0, 1.0) as f32;
            controls.sweep(progress, &now);
            std::thread::sleep(CONTROL_STEP);
        }

        controls.stop(&clock.context());
        tracing::info!("note released, exiting");
        Ok(())
    }
}

/// Render-thread state. Pulls fixed quanta through the effect and hands
/// them out to however many frames the device asks for.
struct Renderer {
    processor: Box<dyn BlockProcessor>,
    signal: TestSignal,
    clock: SharedClock,
    finished: Arc<AtomicBool>,
    input: [Vec<f32>; 2],
    output: [Vec<f32>; 2],
    cursor: usize,
}

impl Renderer {
    fn new(
        processor: Box<dyn BlockProcessor>,
        signal: TestSignal,
        clock: SharedClock,
        finished: Arc<AtomicBool>,
    ) -> Self {
        Self {
            processor,
            signal,
            clock,
            finished,
            input: [vec![0.0; RENDER_QUANTUM], vec![0.0; RENDER_QUANTUM]],
            output: [vec![0.0; RENDER_QUANTUM], vec![0.0; RENDER_QUANTUM]],
            cursor: RENDER_QUANTUM,
        }
    }

    fn fill(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels) {
            if self.cursor == RENDER_QUANTUM {
                self.render_quantum();
                self.cursor = 0;
            }

            let left = self.output[0][self.cursor];
            let right = self.output[1][self.cursor];
            match frame {
                [mono] => *mono = 0.5 * (left + right),
                [l, r, rest @ ..] => {
                    *l = left;
                    *r = right;
                    rest.fill(0.0);
                }
                [] => {}
            }

            self.cursor += 1;
        }
    }

    fn render_quantum(&mut self) {
        let ctx = self.clock.context();

        let [in_left, in_right] = &mut self.input;
        if let Err(err) = self.signal.render(in_left, in_right, &ctx) {
            tracing::error!(%err, "test signal render failed");
        }

        let [out_left, out_right] = &mut self.output;
        let input: [&[f32]; 2] = [&self.input[0], &self.input[1]];
        let mut output: [&mut [f32]; 2] = [out_left, out_right];
        self.processor.process(&input, &mut output, &ctx);

        self.clock.advance(RENDER_QUANTUM);

        if self.signal.envelope().paused(&ctx) {
            self.finished.store(true, Ordering::Release);
        }
    }
}
