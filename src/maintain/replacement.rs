//! Replacement of the weakest template by a validated potential background.

use crate::bank::{PotentialBackground, TemplateBank};
use crate::config::MotionSaliencyConfig;
use crate::image::Mask;
use crate::trace::{trace_event, trace_span};
use crate::util::math::within;
use crate::util::{MotionSalError, MotionSalResult};

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Window {
    /// Window width in pixels.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// Window height in pixels.
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Returns true when `(x, y)` lies inside the window.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }
}

/// Square neighborhood of odd side `size` centered on `(x, y)`, clipped to a
/// `width` x `height` image.
///
/// Corners and edges yield the in-bounds part of the square, so the window is
/// never empty for an in-bounds center.
pub fn neighborhood(x: usize, y: usize, size: usize, width: usize, height: usize) -> Window {
    let half = size / 2;
    Window {
        x0: x.saturating_sub(half),
        y0: y.saturating_sub(half),
        x1: x.saturating_add(half + 1).min(width),
        y1: y.saturating_add(half + 1).min(height),
    }
}

/// Counts window positions whose `slot` value is within `epsilon` of `value`.
fn count_represented(
    bank: &TemplateBank,
    window: Window,
    slot: usize,
    value: f32,
    epsilon: f32,
) -> usize {
    let mut count = 0;
    for y in window.y0..window.y1 {
        for x in window.x0..window.x1 {
            if within(value, bank.pixel_slots(x, y)[slot].value, epsilon) {
                count += 1;
            }
        }
    }
    count
}

/// Writes validated candidates into the last slot of foreground pixels.
///
/// A pixel qualifies when it is foreground in `fused` and its candidate
/// counter exceeds `replacement_threshold`. The candidate is accepted once
/// some slot already holds a close value somewhere in the pixel's
/// neighborhood; the slot scan stops at the first such slot. Pixels are
/// visited in row-major order and see replacements made earlier in the pass.
///
/// Returns the number of replaced templates.
pub fn replace_templates(
    bank: &mut TemplateBank,
    potential: &PotentialBackground,
    fused: &Mask,
    cfg: &MotionSaliencyConfig,
) -> MotionSalResult<usize> {
    let width = bank.width();
    let height = bank.height();
    for (w, h) in [
        (fused.width(), fused.height()),
        (potential.width(), potential.height()),
    ] {
        if (w, h) != (width, height) {
            return Err(MotionSalError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                width: w,
                height: h,
            });
        }
    }
    let _span = trace_span!("template_replacement").entered();

    let last = bank.slots() - 1;
    let mut replaced = 0;
    let cells = fused.as_slice().iter().zip(potential.as_slice());
    for (idx, (&fg, candidate)) in cells.enumerate() {
        if fg != 1 || candidate.counter <= cfg.replacement_threshold {
            continue;
        }
        let (x, y) = (idx % width, idx / width);
        let epsilon = bank.epsilon(x, y);
        let window = neighborhood(x, y, cfg.neighborhood_size, width, height);
        let represented = (0..bank.slots())
            .any(|slot| count_represented(bank, window, slot, candidate.value, epsilon) > 0);
        if represented {
            bank.set(x, y, last, (*candidate).into());
            replaced += 1;
        }
    }

    trace_event!("templates_replaced", count = replaced);
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::neighborhood;

    #[test]
    fn interior_window_is_full() {
        let w = neighborhood(2, 2, 3, 5, 5);
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (1, 1, 4, 4));
        assert_eq!(w.area(), 9);
    }

    #[test]
    fn wide_window_clips_on_small_image() {
        let w = neighborhood(1, 0, 7, 3, 2);
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (0, 0, 3, 2));
    }
}
