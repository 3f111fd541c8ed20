pub mod context; // Render clock and block geometry
pub mod control; // Control -> render parameter mailbox
pub mod dsp;
pub mod effector; // Lifecycle, wiring and envelopes
pub mod effects;
pub mod error;
pub mod processor;

pub use context::{RenderContext, SharedClock};
pub use control::ParamValue;
pub use error::{Error, Result};
pub use processor::BlockProcessor;

pub const MAX_BLOCK_SIZE: usize = 16_384;
/// Frames per render call in a typical host graph.
pub const RENDER_QUANTUM: usize = 128;
