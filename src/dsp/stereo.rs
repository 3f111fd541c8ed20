//! Stereo image processing that works directly on left/right sample pairs.

/// Pass the left channel through and negate the right one.
///
/// With a mono source on both sides this puts the channels 180° apart: the
/// image widens on headphones and cancels when summed to mono.
pub fn invert_phase(left: &[f32], right: &[f32], out_left: &mut [f32], out_right: &mut [f32]) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert_eq!(out_left.len(), left.len());
    debug_assert_eq!(out_right.len(), right.len());

    out_left.copy_from_slice(left);
    for (out, &sample) in out_right.iter_mut().zip(right) {
        *out = -sample;
    }
}

/// Remove centre-panned content by subtracting the opposite channel.
///
/// Lead vocals are usually mixed identically into both channels, so
/// `L - R` cancels them while anything panned off-centre survives.
/// `depth` scales the subtraction: 0 leaves the input alone, 1 removes the
/// centre completely.
pub fn cancel_center(
    left: &[f32],
    right: &[f32],
    out_left: &mut [f32],
    out_right: &mut [f32],
    depth: f32,
) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert_eq!(out_left.len(), left.len());
    debug_assert_eq!(out_right.len(), right.len());

    for (((out_l, out_r), &l), &r) in out_left
        .iter_mut()
        .zip(out_right.iter_mut())
        .zip(left)
        .zip(right)
    {
        *out_l = l - depth * r;
        *out_r = r - depth * l;
    }
}
