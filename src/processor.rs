use crate::context::RenderContext;

/// Render-thread half of an effect.
///
/// The host calls `process` once per render quantum with one slice per
/// channel. Implementations drain their control mailbox, then fill every
/// output channel. They must not allocate, lock or block.
///
/// The return value is the keep-alive flag: `false` tells the host the
/// processor can be dropped from the graph.
pub trait BlockProcessor: Send {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        ctx: &RenderContext,
    ) -> bool;
}

/// Allow boxed processors to be used as processors (for dynamic dispatch)
impl BlockProcessor for Box<dyn BlockProcessor> {
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        ctx: &RenderContext,
    ) -> bool {
        (**self).process(input, output, ctx)
    }
}

/// Copy each input channel to the matching output channel unchanged.
///
/// Channels without a counterpart are left alone. Mismatched lengths copy
/// the common prefix so a host contract violation never panics mid-block.
#[inline]
pub fn bypass(input: &[&[f32]], output: &mut [&mut [f32]]) {
    for (src, dst) in input.iter().zip(output.iter_mut()) {
        copy_channel(src, dst);
    }
}

#[inline]
pub(crate) fn copy_channel(src: &[f32], dst: &mut [f32]) {
    debug_assert_eq!(src.len(), dst.len(), "channel length mismatch");

    let frames = src.len().min(dst.len());
    dst[..frames].copy_from_slice(&src[..frames]);
}
