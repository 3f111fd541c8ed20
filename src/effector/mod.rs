//! Lifecycle shared by every effect: active/inactive state, wiring
//! topology and the one-shot modulation oscillator.
//!
//! The effector lives on the control thread. It decides *which* path audio
//! takes (through the effect's processor or straight from input to output)
//! and records that decision as a list of edges for the host graph to
//! mirror. The signal processing itself happens in the effect's
//! [`BlockProcessor`](crate::processor::BlockProcessor) half.

pub mod envelope;
mod modulator;

use std::fmt;

use crate::context::RenderContext;

pub use envelope::{EnvelopeField, EnvelopeGenerator, EnvelopeParams, MIN_GAIN};
pub use modulator::{Modulator, OscillatorState, RunningOscillator};

/// A connection point in an effect's local graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Input,
    Output,
    /// The effect's render processor.
    Processor,
    /// The modulation oscillator. The generation changes every time the
    /// oscillator is recreated.
    Lfo { generation: u32 },
    /// Gain stage scaling the oscillator output.
    Depth,
    /// A named parameter of the processor.
    Param(&'static str),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Input => write!(f, "input"),
            Endpoint::Output => write!(f, "output"),
            Endpoint::Processor => write!(f, "processor"),
            Endpoint::Lfo { generation } => write!(f, "lfo#{generation}"),
            Endpoint::Depth => write!(f, "depth"),
            Endpoint::Param(name) => write!(f, "param:{name}"),
        }
    }
}

/// Which wiring alternative is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Effect,
    Bypass,
}

/// Ordered edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wiring {
    edges: Vec<(Endpoint, Endpoint)>,
}

impl Wiring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, from: Endpoint, to: Endpoint) {
        self.edges.push((from, to));
    }

    pub fn disconnect_all(&mut self) {
        self.edges.clear();
    }

    pub fn edges(&self) -> &[(Endpoint, Endpoint)] {
        &self.edges
    }

    pub fn is_connected(&self, from: Endpoint, to: Endpoint) -> bool {
        self.edges.contains(&(from, to))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Shape of an effect's wet path.
///
/// Every effect routes `Input -> Processor -> Output` while active. A
/// modulated effect additionally feeds `Lfo -> Depth -> Param(target)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Route {
    modulates: Option<&'static str>,
}

impl Route {
    pub fn processor() -> Self {
        Self { modulates: None }
    }

    pub fn modulated(target: &'static str) -> Self {
        Self {
            modulates: Some(target),
        }
    }

    pub fn modulation_target(&self) -> Option<&'static str> {
        self.modulates
    }
}

#[derive(Debug, Clone)]
pub struct Effector {
    active: bool,
    paused: bool,
    topology: Topology,
    wiring: Wiring,
    route: Route,
    modulator: Modulator,
}

impl Effector {
    /// A paused effector, already wired for its initial state.
    pub fn new(active: bool, route: Route) -> Self {
        let mut effector = Self {
            active,
            paused: true,
            topology: Topology::Bypass,
            wiring: Wiring::new(),
            route,
            modulator: Modulator::default(),
        };
        effector.connect();
        effector
    }

    pub fn with_modulator(mut self, modulator: Modulator) -> Self {
        self.modulator = modulator;
        self.connect();
        self
    }

    pub fn activate(&mut self, ctx: &RenderContext) {
        self.active = true;
        self.connect();
        self.start(0.0, ctx);

        tracing::debug!(edges = self.wiring.len(), "effector activated");
    }

    pub fn deactivate(&mut self, ctx: &RenderContext) {
        self.stop(0.0, 0.0, ctx);
        self.active = false;
        self.connect();

        tracing::debug!("effector bypassed");
    }

    /// Start the modulation oscillator. Times in the past start it now.
    ///
    /// Returns `false` if the effector is inactive or already running.
    pub fn start(&mut self, time: f64, ctx: &RenderContext) -> bool {
        if !self.active || !self.paused {
            return false;
        }

        let at = time.max(ctx.current_time);
        self.modulator.start(at);
        self.paused = false;

        tracing::trace!(at, "effector started");
        true
    }

    /// Stop the modulation oscillator at `time + release`.
    ///
    /// The oscillator cannot be restarted, so it is replaced by a fresh one
    /// with the same configuration and the graph is rewired to it.
    pub fn stop(&mut self, time: f64, release: f64, ctx: &RenderContext) -> bool {
        if !self.active || self.paused {
            return false;
        }

        let at = time.max(ctx.current_time) + release.max(0.0);
        self.modulator.stop(at);
        self.paused = true;
        self.connect();

        tracing::trace!(at, generation = self.modulator.generation(), "effector stopped");
        true
    }

    /// Drop every edge and rebuild the path for the current state.
    pub fn connect(&mut self) -> Endpoint {
        self.wiring.disconnect_all();

        if self.active {
            self.wiring.connect(Endpoint::Input, Endpoint::Processor);
            self.wiring.connect(Endpoint::Processor, Endpoint::Output);

            if let Some(target) = self.route.modulates {
                let lfo = Endpoint::Lfo {
                    generation: self.modulator.generation(),
                };
                self.wiring.connect(lfo, Endpoint::Depth);
                self.wiring.connect(Endpoint::Depth, Endpoint::Param(target));
            }

            self.topology = Topology::Effect;
        } else {
            self.wiring.connect(Endpoint::Input, Endpoint::Output);
            self.topology = Topology::Bypass;
        }

        Endpoint::Output
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn input(&self) -> Endpoint {
        Endpoint::Input
    }

    pub fn output(&self) -> Endpoint {
        Endpoint::Output
    }

    pub fn modulator(&self) -> &Modulator {
        &self.modulator
    }

    pub fn modulator_mut(&mut self) -> &mut Modulator {
        &mut self.modulator
    }
}
