use motionsal::lowlevel::{
    full_resolution_detection, neighborhood, order_pixel_templates, reorder_templates,
    replace_templates,
};
use motionsal::{
    BackgroundCandidate, ImageView, Mask, MotionSalError, MotionSaliencyConfig,
    PotentialBackground, Template, TemplateBank,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bank(width: usize, height: usize, slots: usize, seed: u64) -> TemplateBank {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bank = TemplateBank::new(width, height, slots, 48.5).unwrap();
    for y in 0..height {
        for x in 0..width {
            for slot in 0..slots {
                let value = rng.random_range(0.0f32..255.0);
                let efficacy = rng.random_range(-50i32..4000) as f32;
                bank.set(x, y, slot, Template::new(value, efficacy));
            }
        }
    }
    bank
}

#[test]
fn reorder_sorts_tail_by_descending_efficacy() {
    // Promotion can move the old primary efficacy into slot 1, so keep it out
    // of reach to observe the sort alone.
    let cfg = MotionSaliencyConfig {
        templates: 5,
        promotion_threshold: 1.0e6,
        ..MotionSaliencyConfig::default()
    };
    let mut bank = random_bank(12, 9, cfg.slot_count(), 7);
    reorder_templates(&mut bank, &cfg);

    for y in 0..9 {
        for x in 0..12 {
            let slots = bank.pixel_slots(x, y);
            for pair in slots[1..].windows(2) {
                assert!(
                    pair[0].efficacy >= pair[1].efficacy,
                    "unsorted tail at ({x}, {y}): {slots:?}"
                );
            }
        }
    }
}

#[test]
fn reorder_keeps_value_efficacy_pairs_together() {
    let mut slots = [
        Template::new(10.0, 1.0),
        Template::new(20.0, 2.0),
        Template::new(30.0, 30.0),
        Template::new(40.0, 4.0),
    ];
    order_pixel_templates(&mut slots, 2500.0, 3.0);
    assert_eq!(slots[1], Template::new(30.0, 30.0));
    assert_eq!(slots[2], Template::new(40.0, 4.0));
    assert_eq!(slots[3], Template::new(20.0, 2.0));
}

#[test]
fn strong_secondary_is_promoted() {
    let mut slots = [
        Template::new(80.0, 1000.0),
        Template::new(160.0, 3000.0),
        Template::new(0.0, 0.0),
        Template::new(0.0, 0.0),
    ];
    order_pixel_templates(&mut slots, 2500.0, 3.0);
    assert_eq!(slots[0], Template::new(160.0, 7500.0));
    assert_eq!(slots[1], Template::new(80.0, 1000.0));
}

#[test]
fn promotion_happens_after_sorting_the_tail() {
    let mut slots = [
        Template::new(80.0, 10.0),
        Template::new(1.0, 5.0),
        Template::new(2.0, 2600.0),
    ];
    order_pixel_templates(&mut slots, 2500.0, 3.0);
    assert_eq!(slots[0], Template::new(2.0, 7500.0));
    assert_eq!(slots[1], Template::new(80.0, 10.0));
    assert_eq!(slots[2], Template::new(1.0, 5.0));
}

#[test]
fn neighborhood_covers_all_border_cases() {
    let (width, height) = (5, 5);
    let cases = [
        ((0, 0), 4),
        ((4, 0), 4),
        ((0, 4), 4),
        ((4, 4), 4),
        ((2, 0), 6),
        ((2, 4), 6),
        ((0, 2), 6),
        ((4, 2), 6),
        ((2, 2), 9),
    ];
    for ((x, y), area) in cases {
        let window = neighborhood(x, y, 3, width, height);
        assert_eq!(window.area(), area, "window at ({x}, {y})");
        assert!(window.contains(x, y));
        assert!(window.x1 <= width && window.y1 <= height);
    }
}

#[test]
fn potential_background_only_tracks_foreground() {
    let data = [90u8, 90];
    let frame = ImageView::from_slice(&data, 2, 1).unwrap();
    let cfg = MotionSaliencyConfig::default();
    let mut bank = TemplateBank::new(2, 1, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    bank.set(1, 0, 0, Template::new(90.0, 5.0));
    let full = full_resolution_detection(frame, &mut bank, &cfg).unwrap();
    assert_eq!(full.as_slice(), &[1, 0]);

    let mut potential = PotentialBackground::new(2, 1).unwrap();
    for _ in 0..3 {
        potential.observe(frame, &full, bank.epsilon_map()).unwrap();
    }
    assert_eq!(
        potential.get(0, 0),
        Some(BackgroundCandidate {
            value: 90.0,
            counter: 3.0
        })
    );
    assert_eq!(potential.get(1, 0), Some(BackgroundCandidate::default()));
}

#[test]
fn per_pixel_epsilon_override_changes_match() {
    let data = [130u8, 130];
    let frame = ImageView::from_slice(&data, 2, 1).unwrap();
    let cfg = MotionSaliencyConfig::default();
    let mut bank = TemplateBank::new(2, 1, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    bank.set(0, 0, 0, Template::new(100.0, 5.0));
    bank.set(1, 0, 0, Template::new(100.0, 5.0));
    bank.set_epsilon(1, 0, 10.0);
    assert_eq!(bank.epsilon(1, 0), 10.0);
    assert_eq!(bank.epsilon_map(), &[cfg.initial_epsilon, 10.0]);

    let full = full_resolution_detection(frame, &mut bank, &cfg).unwrap();
    assert_eq!(full.as_slice(), &[0, 1]);
    assert_eq!(bank.get(1, 0, 0), Some(Template::new(100.0, 5.0)));
}

#[test]
fn potential_background_rejects_mismatched_inputs() {
    let data = [200u8; 16];
    let frame = ImageView::from_slice(&data, 4, 4).unwrap();
    let mut potential = PotentialBackground::new(4, 4).unwrap();

    let short_mask = Mask::foreground(4, 2).unwrap();
    let err = potential.observe(frame, &short_mask, &[48.5; 16]).unwrap_err();
    assert_eq!(
        err,
        MotionSalError::DimensionMismatch {
            expected_width: 4,
            expected_height: 4,
            width: 4,
            height: 2
        }
    );

    let mask = Mask::foreground(4, 4).unwrap();
    let err = potential.observe(frame, &mask, &[48.5; 8]).unwrap_err();
    assert_eq!(err, MotionSalError::BufferTooSmall { needed: 16, got: 8 });

    let wide_data = [200u8; 20];
    let wide = ImageView::from_slice(&wide_data, 5, 4).unwrap();
    assert!(matches!(
        potential.observe(wide, &mask, &[48.5; 16]),
        Err(MotionSalError::DimensionMismatch { width: 5, .. })
    ));

    assert!(potential
        .as_slice()
        .iter()
        .all(|c| *c == BackgroundCandidate::default()));
}

fn primed_potential(
    width: usize,
    height: usize,
    picks: &[(usize, usize)],
    value: f32,
) -> PotentialBackground {
    let mut potential = PotentialBackground::new(width, height).unwrap();
    for &(x, y) in picks {
        potential.set(x, y, BackgroundCandidate { value, counter: 250.0 });
    }
    potential
}

#[test]
fn replacement_never_fires_on_background_pixels() {
    let cfg = MotionSaliencyConfig::default();
    let mut bank = TemplateBank::new(5, 5, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    let all: Vec<(usize, usize)> = (0..5).flat_map(|y| (0..5).map(move |x| (x, y))).collect();
    let potential = primed_potential(5, 5, &all, 20.0);
    let before = bank.templates().to_vec();

    let background = Mask::filled(5, 5, 0).unwrap();
    let replaced = replace_templates(&mut bank, &potential, &background, &cfg).unwrap();
    assert_eq!(replaced, 0);
    assert_eq!(bank.templates(), before.as_slice());

    let foreground = Mask::foreground(5, 5).unwrap();
    let replaced = replace_templates(&mut bank, &potential, &foreground, &cfg).unwrap();
    assert_eq!(replaced, 25);
    assert_eq!(bank.get(3, 3, 3), Some(Template::new(20.0, 250.0)));
}

#[test]
fn replacement_requires_counter_above_threshold() {
    let cfg = MotionSaliencyConfig::default();
    let mut bank = TemplateBank::new(3, 3, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    let mut potential = PotentialBackground::new(3, 3).unwrap();
    potential.set(1, 1, BackgroundCandidate { value: 20.0, counter: 200.0 });
    let fused = Mask::foreground(3, 3).unwrap();
    assert_eq!(replace_templates(&mut bank, &potential, &fused, &cfg).unwrap(), 0);

    potential.set(1, 1, BackgroundCandidate { value: 20.0, counter: 201.0 });
    assert_eq!(replace_templates(&mut bank, &potential, &fused, &cfg).unwrap(), 1);
    assert_eq!(bank.get(1, 1, 3), Some(Template::new(20.0, 201.0)));
}

#[test]
fn replacement_needs_a_similar_neighbor() {
    let cfg = MotionSaliencyConfig::default();
    let mut bank = TemplateBank::new(5, 5, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    bank.set(1, 1, 2, Template::new(190.0, 0.0));
    let potential = primed_potential(5, 5, &[(0, 0), (4, 4)], 200.0);
    let fused = Mask::foreground(5, 5).unwrap();

    let replaced = replace_templates(&mut bank, &potential, &fused, &cfg).unwrap();
    assert_eq!(replaced, 1);
    assert_eq!(bank.get(0, 0, 3), Some(Template::new(200.0, 250.0)));
    assert_eq!(bank.get(4, 4, 3), Some(Template::default()));
}

#[test]
fn wider_neighborhood_reaches_farther_templates() {
    let cfg = MotionSaliencyConfig {
        neighborhood_size: 5,
        ..MotionSaliencyConfig::default()
    };
    let mut bank = TemplateBank::new(5, 5, cfg.slot_count(), cfg.initial_epsilon).unwrap();
    bank.set(2, 2, 1, Template::new(205.0, 3.0));
    let potential = primed_potential(5, 5, &[(4, 4)], 200.0);
    let fused = Mask::foreground(5, 5).unwrap();

    assert_eq!(replace_templates(&mut bank, &potential, &fused, &cfg).unwrap(), 1);
    assert_eq!(bank.get(4, 4, 3), Some(Template::new(200.0, 250.0)));
}
