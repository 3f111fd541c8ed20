//! fxdemo - play a test signal through one effect while sweeping its
//! parameters from the control thread.
//!
//! Run with: cargo run --bin fxdemo -- [gate|suppressor|pitch|stereo|canceler]
//! Set RUST_LOG=effector_dsp=debug to see rejected parameters and queue
//! back-pressure.

mod app;
mod source;

use app::{EffectKind, FxDemo};
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let kind: EffectKind = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("suppressor")
        .parse()?;

    FxDemo::new(kind).seconds(8.0).run()
}
