//! Processor-level benchmarks.
//!
//! These run the render halves exactly as a host would: stereo blocks,
//! mailbox drained at the top of every call.

mod control;
mod processors;

pub use control::bench_control;
pub use processors::bench_processors;

/// Stereo scratch buffers sized for one block.
pub struct StereoBlock {
    pub input: [Vec<f32>; 2],
    pub output: [Vec<f32>; 2],
}

impl StereoBlock {
    pub fn new(size: usize) -> Self {
        let left = crate::dsp::test_block(size);
        let right: Vec<f32> = left.iter().map(|s| s * 0.8).collect();

        Self {
            input: [left, right],
            output: [vec![0.0; size], vec![0.0; size]],
        }
    }

    pub fn run<P: effector_dsp::BlockProcessor>(
        &mut self,
        processor: &mut P,
        ctx: &effector_dsp::RenderContext,
    ) -> bool {
        let [out_left, out_right] = &mut self.output;
        let input: [&[f32]; 2] = [&self.input[0], &self.input[1]];
        let mut output: [&mut [f32]; 2] = [out_left, out_right];
        processor.process(&input, &mut output, ctx)
    }
}
