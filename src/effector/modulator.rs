use crate::dsp::lfo::{phase_at, Waveform};

/*
One-Shot Modulation Oscillator
==============================

Host oscillators are one-shot: once stopped they can never be started
again. The modulator therefore never tries to restart a handle. `stop`
throws the running oscillator away and leaves a fresh, configured one in
its place; `start` always builds a new running handle from the stored
configuration.

    ┌─────────┐  start(t)   ┌──────────────────┐
    │ Stopped │ ──────────→ │ Running(handle)  │
    └─────────┘             └──────────────────┘
         ↑        stop(t)            │
         └───────────────────────────┘
              generation += 1

Every recreation bumps `generation`. Wiring refers to the oscillator by
generation, so a connection made to a destroyed oscillator is visibly
stale until the effector reconnects.
*/

/// A started oscillator. Dropped on stop, never resumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningOscillator {
    waveform: Waveform,
    frequency: f32,
    depth: f32,
    started_at: f64,
}

impl RunningOscillator {
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Modulation output at `time` on the render clock: `depth * wave`.
    /// Silent before the start time.
    pub fn value_at(&self, time: f64) -> f32 {
        if time < self.started_at {
            return 0.0;
        }
        let phase = phase_at(self.frequency, time - self.started_at);
        self.depth * self.waveform.evaluate(phase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OscillatorState {
    Stopped,
    Running(RunningOscillator),
}

#[derive(Debug, Clone)]
pub struct Modulator {
    waveform: Waveform,
    frequency: f32,
    depth: f32,
    generation: u32,
    state: OscillatorState,
}

impl Modulator {
    pub fn new(waveform: Waveform, frequency: f32, depth: f32) -> Self {
        Self {
            waveform,
            frequency: frequency.max(0.0),
            depth,
            generation: 0,
            state: OscillatorState::Stopped,
        }
    }

    pub fn start(&mut self, time: f64) {
        self.state = OscillatorState::Running(RunningOscillator {
            waveform: self.waveform,
            frequency: self.frequency,
            depth: self.depth,
            started_at: time,
        });
    }

    /// Destroy the running oscillator and put a fresh one, with the same
    /// waveform and frequency, in its place.
    pub fn stop(&mut self, time: f64) {
        if let OscillatorState::Running(running) = &self.state {
            tracing::debug!(
                generation = self.generation,
                waveform = self.waveform.name(),
                started_at = running.started_at,
                stop_at = time,
                "recreating modulation oscillator"
            );
        }

        self.state = OscillatorState::Stopped;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, OscillatorState::Running(_))
    }

    pub fn state(&self) -> &OscillatorState {
        &self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        if let OscillatorState::Running(running) = &mut self.state {
            running.waveform = waveform;
        }
    }

    /// Negative rates are ignored.
    pub fn set_frequency(&mut self, frequency: f32) {
        if !(frequency.is_finite() && frequency >= 0.0) {
            tracing::debug!(frequency, "ignoring invalid modulation rate");
            return;
        }
        self.frequency = frequency;
        if let OscillatorState::Running(running) = &mut self.state {
            running.frequency = frequency;
        }
    }

    pub fn set_depth(&mut self, depth: f32) {
        if !depth.is_finite() {
            return;
        }
        self.depth = depth;
        if let OscillatorState::Running(running) = &mut self.state {
            running.depth = depth;
        }
    }

    /// Current modulation output, 0 while stopped.
    pub fn value_at(&self, time: f64) -> f32 {
        match &self.state {
            OscillatorState::Running(running) => running.value_at(time),
            OscillatorState::Stopped => 0.0,
        }
    }
}

impl Default for Modulator {
    fn default() -> Self {
        Self::new(Waveform::Sine, 0.0, 0.0)
    }
}
