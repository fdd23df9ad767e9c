//! Block-mean matching against the leading template slots.

use crate::bank::TemplateBank;
use crate::config::{BlockRemainder, MotionSaliencyConfig};
use crate::image::{ImageView, Mask};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{div_ceil, within};
use crate::util::MotionSalResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Block grid derived from the frame size and the remainder policy.
#[derive(Clone, Copy, Debug)]
struct BlockGrid {
    size: usize,
    cols: usize,
    rows: usize,
}

impl BlockGrid {
    fn new(width: usize, height: usize, size: usize, remainder: BlockRemainder) -> Self {
        let (cols, rows) = match remainder {
            BlockRemainder::Foreground => (width / size, height / size),
            BlockRemainder::PartialBlocks => (div_ceil(width, size), div_ceil(height, size)),
        };
        Self { size, cols, rows }
    }
}

/// Returns true when the block mean matches the block mean of an active
/// leading slot.
fn block_is_background(
    frame: ImageView<'_, u8>,
    bank: &TemplateBank,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    coarse_templates: usize,
) -> bool {
    let count = ((x1 - x0) * (y1 - y0)) as f64;
    let width = bank.width();
    let slots = bank.slots();
    let templates = bank.templates();
    let epsilon = bank.epsilon_map();

    let mut pixel_sum = 0.0f64;
    let mut eps_sum = 0.0f64;
    for y in y0..y1 {
        if let Some(row) = frame.row(y) {
            pixel_sum += row[x0..x1].iter().map(|&v| f64::from(v)).sum::<f64>();
        }
        let start = y * width;
        eps_sum += epsilon[start + x0..start + x1]
            .iter()
            .map(|&v| f64::from(v))
            .sum::<f64>();
    }
    let pixel_mean = (pixel_sum / count) as f32;
    let eps_mean = (eps_sum / count) as f32;

    for slot in 0..coarse_templates.min(slots) {
        let mut value_sum = 0.0f64;
        let mut efficacy_sum = 0.0f64;
        for y in y0..y1 {
            let start = (y * width + x0) * slots + slot;
            let end = (y * width + x1) * slots;
            for tpl in templates[start..end].iter().step_by(slots) {
                value_sum += f64::from(tpl.value);
                efficacy_sum += f64::from(tpl.efficacy);
            }
        }
        let efficacy_mean = efficacy_sum / count;
        let value_mean = (value_sum / count) as f32;
        if efficacy_mean > 0.0 && within(pixel_mean, value_mean, eps_mean) {
            return true;
        }
    }
    false
}

/// Classifies one band of block rows, writing zeros for background blocks.
fn classify_band(
    frame: ImageView<'_, u8>,
    bank: &TemplateBank,
    grid: BlockGrid,
    band: usize,
    mask_band: &mut [u8],
    coarse_templates: usize,
) -> usize {
    let width = bank.width();
    let y0 = band * grid.size;
    let y1 = (y0 + grid.size).min(bank.height());
    let mut background_blocks = 0;
    for col in 0..grid.cols {
        let x0 = col * grid.size;
        let x1 = (x0 + grid.size).min(width);
        if block_is_background(frame, bank, x0, y0, x1, y1, coarse_templates) {
            for mask_row in mask_band.chunks_exact_mut(width) {
                mask_row[x0..x1].fill(0);
            }
            background_blocks += 1;
        }
    }
    background_blocks
}

/// Classifies `block_size` x `block_size` blocks by comparing block means.
///
/// Only the first `coarse_templates` slots are consulted and the bank is
/// never modified. Every pixel inherits the decision of its block; pixels
/// outside the scanned grid stay foreground unless the remainder policy asks
/// for partial blocks.
pub fn low_resolution_detection(
    frame: ImageView<'_, u8>,
    bank: &TemplateBank,
    cfg: &MotionSaliencyConfig,
) -> MotionSalResult<Mask> {
    bank.check_frame(frame)?;
    let _span = trace_span!("low_resolution", block = cfg.block_size).entered();

    let width = bank.width();
    let height = bank.height();
    let grid = BlockGrid::new(width, height, cfg.block_size, cfg.block_remainder);
    let mut mask = Mask::foreground(width, height)?;
    let band_len = width * grid.size;

    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            let background_blocks: usize = mask
                .as_mut_slice()
                .par_chunks_mut(band_len)
                .take(grid.rows)
                .enumerate()
                .map(|(band, mask_band)| {
                    classify_band(frame, bank, grid, band, mask_band, cfg.coarse_templates)
                })
                .sum();
            trace_event!("low_resolution_background_blocks", count = background_blocks);
            return Ok(mask);
        }
    }

    let mut background_blocks = 0;
    for (band, mask_band) in mask
        .as_mut_slice()
        .chunks_mut(band_len)
        .take(grid.rows)
        .enumerate()
    {
        background_blocks +=
            classify_band(frame, bank, grid, band, mask_band, cfg.coarse_templates);
    }

    trace_event!("low_resolution_background_blocks", count = background_blocks);
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::{low_resolution_detection, BlockGrid};
    use crate::bank::{Template, TemplateBank};
    use crate::config::{BlockRemainder, MotionSaliencyConfig};
    use crate::image::ImageView;

    const FRAME: [u8; 16] = [100; 16];

    fn bank_with(fill: impl Fn(usize, usize, usize) -> Template) -> TemplateBank {
        let cfg = MotionSaliencyConfig::default();
        let mut bank = TemplateBank::new(4, 4, cfg.slot_count(), cfg.initial_epsilon).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                for slot in 0..cfg.slot_count() {
                    bank.set(x, y, slot, fill(x, y, slot));
                }
            }
        }
        bank
    }

    fn classify(bank: &TemplateBank, cfg: &MotionSaliencyConfig) -> Vec<u8> {
        let frame = ImageView::from_slice(&FRAME, 4, 4).unwrap();
        low_resolution_detection(frame, bank, cfg)
            .unwrap()
            .as_slice()
            .to_vec()
    }

    #[test]
    fn grid_drops_or_keeps_remainder() {
        let whole = BlockGrid::new(10, 9, 4, BlockRemainder::Foreground);
        assert_eq!((whole.cols, whole.rows), (2, 2));
        let partial = BlockGrid::new(10, 9, 4, BlockRemainder::PartialBlocks);
        assert_eq!((partial.cols, partial.rows), (3, 3));
    }

    #[test]
    fn only_leading_slots_are_consulted() {
        let bank = bank_with(|_, _, slot| match slot {
            2 => Template::new(100.0, 5.0),
            _ => Template::new(0.0, 5.0),
        });
        let cfg = MotionSaliencyConfig::default();
        assert_eq!(classify(&bank, &cfg), vec![1; 16]);

        let wider = MotionSaliencyConfig {
            coarse_templates: 3,
            ..cfg
        };
        assert_eq!(classify(&bank, &wider), vec![0; 16]);
    }

    #[test]
    fn activity_follows_block_mean_efficacy() {
        let cfg = MotionSaliencyConfig::default();
        let positive = bank_with(|x, _, slot| match (slot, x < 2) {
            (0, true) => Template::new(100.0, 3.0),
            (0, false) => Template::new(100.0, -1.0),
            _ => Template::default(),
        });
        assert_eq!(classify(&positive, &cfg), vec![0; 16]);

        let negative = bank_with(|x, _, slot| match (slot, x < 2) {
            (0, true) => Template::new(100.0, -3.0),
            (0, false) => Template::new(100.0, 1.0),
            _ => Template::default(),
        });
        assert_eq!(classify(&negative, &cfg), vec![1; 16]);
    }

    #[test]
    fn mean_difference_equal_to_epsilon_is_foreground() {
        let cfg = MotionSaliencyConfig::default();
        let boundary = bank_with(|_, _, slot| match slot {
            0 => Template::new(100.0 + cfg.initial_epsilon, 5.0),
            _ => Template::default(),
        });
        assert_eq!(classify(&boundary, &cfg), vec![1; 16]);

        let inside = bank_with(|_, _, slot| match slot {
            0 => Template::new(148.0, 5.0),
            _ => Template::default(),
        });
        assert_eq!(classify(&inside, &cfg), vec![0; 16]);
    }
}
