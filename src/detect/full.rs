//! Full-resolution matching with in-place template adaptation.

use crate::bank::{Template, TemplateBank};
use crate::config::{MismatchDecay, MotionSaliencyConfig};
use crate::image::{ImageView, Mask};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{ema, within};
use crate::util::MotionSalResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
struct AdaptParams {
    learning_rate: f32,
    primary_cap: f32,
    secondary_cap: f32,
    decay: MismatchDecay,
}

impl AdaptParams {
    fn from_config(cfg: &MotionSaliencyConfig) -> Self {
        Self {
            learning_rate: cfg.learning_rate,
            primary_cap: cfg.primary_cap,
            secondary_cap: cfg.secondary_cap,
            decay: cfg.mismatch_decay,
        }
    }

    #[inline]
    fn may_increment(&self, slot: usize, efficacy: f32) -> bool {
        match slot {
            0 => efficacy < self.primary_cap,
            1 => efficacy < self.secondary_cap,
            _ => true,
        }
    }
}

/// Matches one pixel against its slots and returns true on a background match.
///
/// Only the first matching active slot is credited; later slots are still
/// visited so the decay policy can apply to them.
#[inline]
fn classify_pixel(
    pixel: f32,
    epsilon: f32,
    templates: &mut [Template],
    params: &AdaptParams,
) -> bool {
    let mut matched = false;
    for (slot, tpl) in templates.iter_mut().enumerate() {
        if !tpl.is_active() {
            continue;
        }
        if !matched && within(pixel, tpl.value, epsilon) {
            if params.may_increment(slot, tpl.efficacy) {
                tpl.efficacy += 1.0;
            }
            tpl.value = ema(tpl.value, pixel, params.learning_rate);
            matched = true;
            continue;
        }
        match params.decay {
            MismatchDecay::Inert => {}
            MismatchDecay::UntilMatch if matched => {}
            MismatchDecay::UntilMatch | MismatchDecay::All => tpl.efficacy -= 1.0,
        }
    }
    matched
}

fn classify_row(
    row: &[u8],
    eps_row: &[f32],
    templates: &mut [Template],
    mask_row: &mut [u8],
    slots: usize,
    params: &AdaptParams,
) {
    for (((&px, &eps), pixel_templates), fg) in row
        .iter()
        .zip(eps_row)
        .zip(templates.chunks_exact_mut(slots))
        .zip(mask_row.iter_mut())
    {
        if classify_pixel(f32::from(px), eps, pixel_templates, params) {
            *fg = 0;
        }
    }
}

/// Classifies every pixel against the template bank and adapts matched templates.
///
/// Returns a mask with `1` for pixels no active template explains. The frame
/// is checked against the bank size before anything is modified.
pub fn full_resolution_detection(
    frame: ImageView<'_, u8>,
    bank: &mut TemplateBank,
    cfg: &MotionSaliencyConfig,
) -> MotionSalResult<Mask> {
    bank.check_frame(frame)?;
    let _span = trace_span!("full_resolution", width = frame.width(), height = frame.height())
        .entered();

    let width = bank.width();
    let slots = bank.slots();
    let params = AdaptParams::from_config(cfg);
    let mut mask = Mask::foreground(width, bank.height())?;
    let (templates, epsilon) = bank.split_mut();

    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            templates
                .par_chunks_mut(width * slots)
                .zip(mask.as_mut_slice().par_chunks_mut(width))
                .zip(epsilon.par_chunks(width))
                .enumerate()
                .for_each(|(y, ((tpl_row, mask_row), eps_row))| {
                    if let Some(row) = frame.row(y) {
                        classify_row(row, eps_row, tpl_row, mask_row, slots, &params);
                    }
                });
            trace_event!("full_resolution_foreground", count = mask.count_foreground());
            return Ok(mask);
        }
    }

    for (((row, tpl_row), mask_row), eps_row) in frame
        .rows()
        .zip(templates.chunks_exact_mut(width * slots))
        .zip(mask.as_mut_slice().chunks_exact_mut(width))
        .zip(epsilon.chunks_exact(width))
    {
        classify_row(row, eps_row, tpl_row, mask_row, slots, &params);
    }

    trace_event!("full_resolution_foreground", count = mask.count_foreground());
    Ok(mask)
}
