#![cfg(feature = "rayon")]

use motionsal::{BlockRemainder, MismatchDecay, MotionSaliency, MotionSaliencyConfig, OwnedImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_sequence(width: usize, height: usize, frames: usize, seed: u64) -> Vec<OwnedImage> {
    let mut rng = StdRng::seed_from_u64(seed);
    let background: Vec<u8> = (0..width * height)
        .map(|i| (((i % width) * 3 + (i / width) * 5) % 120 + 40) as u8)
        .collect();
    (0..frames)
        .map(|t| {
            let mut data: Vec<u8> = background
                .iter()
                .map(|&v| v.saturating_add(rng.random_range(0u8..12)))
                .collect();
            let x0 = (t * 3) % (width - 8);
            let y0 = (t * 2) % (height - 8);
            for y in y0..y0 + 8 {
                for x in x0..x0 + 8 {
                    data[y * width + x] = 230;
                }
            }
            OwnedImage::new(data, width, height).unwrap()
        })
        .collect()
}

fn assert_equivalent(base: MotionSaliencyConfig) {
    let (width, height) = (45, 38);
    let frames = make_sequence(width, height, 40, 5);

    let mut seq = MotionSaliency::new(MotionSaliencyConfig {
        parallel: false,
        ..base.clone()
    })
    .unwrap();
    let mut par = MotionSaliency::new(MotionSaliencyConfig {
        parallel: true,
        ..base
    })
    .unwrap();
    seq.initialize(width, height).unwrap();
    par.initialize(width, height).unwrap();

    for (t, frame) in frames.iter().enumerate() {
        let a = seq.process_frame(frame.view()).unwrap();
        let b = par.process_frame(frame.view()).unwrap();
        assert_eq!(a, b, "masks diverged at frame {t}");
    }
    assert_eq!(
        seq.bank().unwrap().templates(),
        par.bank().unwrap().templates()
    );
    assert_eq!(
        seq.potential_background().unwrap().as_slice(),
        par.potential_background().unwrap().as_slice()
    );
}

#[test]
fn parallel_matches_sequential_defaults() {
    assert_equivalent(MotionSaliencyConfig {
        replacement_threshold: 5.0,
        ..MotionSaliencyConfig::default()
    });
}

#[test]
fn parallel_matches_sequential_with_partial_blocks_and_decay() {
    assert_equivalent(MotionSaliencyConfig {
        block_size: 7,
        block_remainder: BlockRemainder::PartialBlocks,
        mismatch_decay: MismatchDecay::UntilMatch,
        replacement_threshold: 3.0,
        promotion_threshold: 20.0,
        ..MotionSaliencyConfig::default()
    });
}
