//! Efficacy ordering and primary-slot promotion.

use crate::bank::{Template, TemplateBank};
use crate::config::MotionSaliencyConfig;
use crate::trace::trace_span;
use std::cmp::Ordering;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

fn efficacy_cmp_desc(a: &Template, b: &Template) -> Ordering {
    b.efficacy.total_cmp(&a.efficacy)
}

/// Sorts slots `1..` by descending efficacy (stable), then promotes slot 1
/// into slot 0 when slot 1 is above `promotion_threshold` and slot 0 is below.
///
/// A promoted template gets `promotion_gain * promotion_threshold` efficacy
/// and the demoted one keeps its previous efficacy in slot 1.
pub fn order_pixel_templates(
    templates: &mut [Template],
    promotion_threshold: f32,
    promotion_gain: f32,
) {
    if templates.len() < 2 {
        return;
    }
    templates[1..].sort_by(efficacy_cmp_desc);

    let primary = templates[0];
    let secondary = templates[1];
    if secondary.efficacy > promotion_threshold && primary.efficacy < promotion_threshold {
        templates[0] = Template::new(secondary.value, promotion_gain * promotion_threshold);
        templates[1] = Template::new(primary.value, primary.efficacy);
    }
}

/// Applies [`order_pixel_templates`] to every pixel of the bank.
pub fn reorder_templates(bank: &mut TemplateBank, cfg: &MotionSaliencyConfig) {
    let _span = trace_span!("template_ordering").entered();
    let slots = bank.slots();
    let threshold = cfg.promotion_threshold;
    let gain = cfg.promotion_gain;

    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            bank.templates_mut()
                .par_chunks_mut(slots)
                .for_each(|pixel| order_pixel_templates(pixel, threshold, gain));
            return;
        }
    }

    for pixel in bank.templates_mut().chunks_exact_mut(slots) {
        order_pixel_templates(pixel, threshold, gain);
    }
}

#[cfg(test)]
mod tests {
    use super::order_pixel_templates;
    use crate::bank::Template;

    #[test]
    fn sorts_tail_and_leaves_primary() {
        let mut slots = [
            Template::new(9.0, 100.0),
            Template::new(1.0, 5.0),
            Template::new(2.0, 50.0),
            Template::new(3.0, -4.0),
            Template::new(4.0, 50.0),
        ];
        order_pixel_templates(&mut slots, 2500.0, 3.0);
        assert_eq!(slots[0], Template::new(9.0, 100.0));
        let values: Vec<f32> = slots[1..].iter().map(|t| t.value).collect();
        assert_eq!(values, vec![2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn promotion_requires_both_conditions() {
        let mut strong_primary = [Template::new(1.0, 2600.0), Template::new(2.0, 3000.0)];
        order_pixel_templates(&mut strong_primary, 2500.0, 3.0);
        assert_eq!(strong_primary[0], Template::new(1.0, 2600.0));

        let mut weak_secondary = [Template::new(1.0, 10.0), Template::new(2.0, 2500.0)];
        order_pixel_templates(&mut weak_secondary, 2500.0, 3.0);
        assert_eq!(weak_secondary[0], Template::new(1.0, 10.0));
    }

    #[test]
    fn single_slot_bank_is_untouched() {
        let mut slots = [Template::new(1.0, 1.0)];
        order_pixel_templates(&mut slots, 0.0, 3.0);
        assert_eq!(slots[0], Template::new(1.0, 1.0));
    }
}
