//! Combination of the full- and low-resolution masks.

use crate::image::Mask;
use crate::util::{MotionSalError, MotionSalResult};

fn check_same_size(a: &Mask, b: &Mask) -> MotionSalResult<()> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(MotionSalError::DimensionMismatch {
            expected_width: a.width(),
            expected_height: a.height(),
            width: b.width(),
            height: b.height(),
        });
    }
    Ok(())
}

fn combine(a: &Mask, b: &Mask, op: impl Fn(u8, u8) -> u8) -> MotionSalResult<Mask> {
    check_same_size(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| op(x, y))
        .collect();
    Ok(Mask::from_raw(data, a.width(), a.height()))
}

/// Foreground where both passes report foreground.
pub fn fuse_masks(full: &Mask, low: &Mask) -> MotionSalResult<Mask> {
    combine(full, low, |f, l| f & l)
}

/// Foreground at full resolution that the block pass does not corroborate.
pub fn noise_mask(full: &Mask, low: &Mask) -> MotionSalResult<Mask> {
    combine(full, low, |f, l| f & (l ^ 1))
}
