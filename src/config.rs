//! Tunable constants and policy switches for the background model.

use crate::util::{MotionSalError, MotionSalResult};

/// How the full-resolution pass treats active templates that do not match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MismatchDecay {
    /// Efficacy is left unchanged on a mismatch. This reproduces the
    /// published detector, whose decrement never reached the stored template.
    #[default]
    Inert,
    /// Non-matching templates lose one unit of efficacy until the first match
    /// for the pixel; templates scanned after the match are left alone.
    UntilMatch,
    /// Every active template other than the first match loses one unit,
    /// including templates scanned after the match.
    All,
}

/// Handling of the right/bottom strips that do not fill a whole block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockRemainder {
    /// Leave remainder pixels at the mask default (foreground).
    #[default]
    Foreground,
    /// Evaluate the clipped partial blocks with their own means.
    PartialBlocks,
}

/// How an empty template bank is brought to life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bootstrap {
    /// The first frame after initialization seeds slot 0 of every pixel with
    /// its intensity and an efficacy of one before classification.
    #[default]
    FirstFrame,
    /// Keep every template inactive; templates only appear via replacement.
    None,
}

/// Configuration for [`MotionSaliency`](crate::MotionSaliency).
#[derive(Clone, Debug, PartialEq)]
pub struct MotionSaliencyConfig {
    /// Number of templates after the primary one (slots `0..=templates`).
    pub templates: usize,
    /// Side of the square blocks used by the low-resolution pass.
    pub block_size: usize,
    /// Number of leading slots checked by the low-resolution pass.
    pub coarse_templates: usize,
    /// Blend rate used to pull a matched template toward the pixel.
    pub learning_rate: f32,
    /// Efficacy cap for slot 0.
    pub primary_cap: f32,
    /// Efficacy cap for slot 1.
    pub secondary_cap: f32,
    /// Efficacy level that triggers swapping slot 1 into slot 0.
    pub promotion_threshold: f32,
    /// Potential-background counter above which a candidate may replace a template.
    pub replacement_threshold: f32,
    /// Multiplier applied to `promotion_threshold` for a promoted template.
    pub promotion_gain: f32,
    /// Initial per-pixel matching tolerance.
    pub initial_epsilon: f32,
    /// Odd side of the neighborhood checked before a replacement.
    pub neighborhood_size: usize,
    /// Efficacy handling for mismatching templates.
    pub mismatch_decay: MismatchDecay,
    /// Handling of pixels outside the last whole block.
    pub block_remainder: BlockRemainder,
    /// Seeding of a freshly initialized bank.
    pub bootstrap: Bootstrap,
    /// Run per-pixel stages on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for MotionSaliencyConfig {
    fn default() -> Self {
        Self {
            templates: 3,
            block_size: 4,
            coarse_templates: 2,
            learning_rate: 0.01,
            primary_cap: 6000.0,
            secondary_cap: 4000.0,
            promotion_threshold: 2500.0,
            replacement_threshold: 200.0,
            promotion_gain: 3.0,
            // Median of the [18, 80] range recommended for 8-bit video.
            initial_epsilon: 48.5,
            neighborhood_size: 3,
            mismatch_decay: MismatchDecay::default(),
            block_remainder: BlockRemainder::default(),
            bootstrap: Bootstrap::default(),
            parallel: false,
        }
    }
}

impl MotionSaliencyConfig {
    /// Total number of slots per pixel (`templates + 1`).
    pub fn slot_count(&self) -> usize {
        self.templates + 1
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> MotionSalResult<()> {
        let invalid = |reason: &'static str| -> MotionSalResult<()> {
            Err(MotionSalError::InvalidConfiguration { reason })
        };
        if self.templates == 0 {
            return invalid("templates must be at least 1");
        }
        if self.block_size == 0 {
            return invalid("block_size must be positive");
        }
        if self.coarse_templates == 0 {
            return invalid("coarse_templates must be positive");
        }
        if self.coarse_templates > self.slot_count() {
            return invalid("coarse_templates exceeds the number of slots");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid("learning_rate must be in (0, 1]");
        }
        if !(self.initial_epsilon.is_finite() && self.initial_epsilon > 0.0) {
            return invalid("initial_epsilon must be positive and finite");
        }
        let finite = [
            self.primary_cap,
            self.secondary_cap,
            self.promotion_threshold,
            self.replacement_threshold,
            self.promotion_gain,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("efficacy parameters must be finite");
        }
        if self.primary_cap <= 0.0 || self.secondary_cap <= 0.0 {
            return invalid("efficacy caps must be positive");
        }
        if self.neighborhood_size == 0 || self.neighborhood_size % 2 == 0 {
            return invalid("neighborhood_size must be odd");
        }
        Ok(())
    }
}
