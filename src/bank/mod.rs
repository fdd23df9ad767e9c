//! Per-pixel template storage.
//!
//! Every pixel owns `slots` consecutive [`Template`] records in one flat
//! arena, addressed as `(y * width + x) * slots + slot`. A row of pixels is
//! therefore a contiguous `width * slots` chunk, which lets the row-parallel
//! passes split the arena without sharing any pixel between workers.
//!
//! Slot 0 is the primary background hypothesis and slot 1 the secondary one;
//! the remaining slots are kept sorted by efficacy during maintenance.

pub mod potential;

pub use potential::{BackgroundCandidate, PotentialBackground};

use crate::image::ImageView;
use crate::util::{MotionSalError, MotionSalResult};

/// One background hypothesis for a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Template {
    /// Background intensity.
    pub value: f32,
    /// Confidence counter; the template is inactive when this is `<= 0`.
    pub efficacy: f32,
}

impl Template {
    /// Creates a template.
    pub fn new(value: f32, efficacy: f32) -> Self {
        Self { value, efficacy }
    }

    /// Returns true when the template takes part in matching.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.efficacy > 0.0
    }
}

impl From<BackgroundCandidate> for Template {
    fn from(candidate: BackgroundCandidate) -> Self {
        Self {
            value: candidate.value,
            efficacy: candidate.counter,
        }
    }
}

/// Template arena plus the per-pixel matching tolerance map.
#[derive(Clone, Debug)]
pub struct TemplateBank {
    width: usize,
    height: usize,
    slots: usize,
    templates: Vec<Template>,
    epsilon: Vec<f32>,
}

impl TemplateBank {
    /// Allocates an all-inactive bank with `slots` templates per pixel.
    pub fn new(
        width: usize,
        height: usize,
        slots: usize,
        initial_epsilon: f32,
    ) -> MotionSalResult<Self> {
        if width == 0 || height == 0 {
            return Err(MotionSalError::InvalidDimensions { width, height });
        }
        if slots == 0 {
            return Err(MotionSalError::InvalidConfiguration {
                reason: "template bank needs at least one slot",
            });
        }
        let pixels = width
            .checked_mul(height)
            .ok_or(MotionSalError::InvalidDimensions { width, height })?;
        let len = pixels
            .checked_mul(slots)
            .ok_or(MotionSalError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            slots,
            templates: vec![Template::default(); len],
            epsilon: vec![initial_epsilon; pixels],
        })
    }

    /// Returns the bank width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the bank height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of slots per pixel.
    pub fn slots(&self) -> usize {
        self.slots
    }

    #[inline]
    fn pixel_offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y * self.width + x) * self.slots
    }

    /// Returns the template at `(x, y, slot)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize, slot: usize) -> Option<Template> {
        if x >= self.width || y >= self.height || slot >= self.slots {
            return None;
        }
        self.templates.get(self.pixel_offset(x, y) + slot).copied()
    }

    /// Overwrites the template at `(x, y, slot)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates or the slot are out of range.
    pub fn set(&mut self, x: usize, y: usize, slot: usize, template: Template) {
        assert!(slot < self.slots, "slot {slot} out of range");
        let offset = self.pixel_offset(x, y);
        self.templates[offset + slot] = template;
    }

    /// Returns the templates of one pixel in slot order.
    pub fn pixel_slots(&self, x: usize, y: usize) -> &[Template] {
        let offset = self.pixel_offset(x, y);
        &self.templates[offset..offset + self.slots]
    }

    /// Returns the templates of one pixel in slot order, mutably.
    pub fn pixel_slots_mut(&mut self, x: usize, y: usize) -> &mut [Template] {
        let offset = self.pixel_offset(x, y);
        &mut self.templates[offset..offset + self.slots]
    }

    /// Returns the whole arena in pixel-major order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub(crate) fn templates_mut(&mut self) -> &mut [Template] {
        &mut self.templates
    }

    /// Splits the bank into the mutable arena and the read-only tolerance map.
    pub(crate) fn split_mut(&mut self) -> (&mut [Template], &[f32]) {
        (&mut self.templates, &self.epsilon)
    }

    /// Returns the matching tolerance of one pixel.
    pub fn epsilon(&self, x: usize, y: usize) -> f32 {
        self.epsilon[y * self.width + x]
    }

    /// Returns the tolerance map in row-major order.
    pub fn epsilon_map(&self) -> &[f32] {
        &self.epsilon
    }

    /// Overrides the tolerance of one pixel.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the bank.
    pub fn set_epsilon(&mut self, x: usize, y: usize, value: f32) {
        self.epsilon[y * self.width + x] = value;
    }

    /// Number of pixels whose template in `slot` is active.
    pub fn active_count(&self, slot: usize) -> usize {
        if slot >= self.slots {
            return 0;
        }
        self.templates
            .chunks_exact(self.slots)
            .filter(|pixel| pixel[slot].is_active())
            .count()
    }

    /// Seeds slot 0 of every pixel with the frame intensity and efficacy one.
    ///
    /// The frame must have the bank's dimensions.
    pub fn seed_from_frame(&mut self, frame: ImageView<'_, u8>) -> MotionSalResult<()> {
        self.check_frame(frame)?;
        let slots = self.slots;
        let width = self.width;
        for (row, pixels) in frame
            .rows()
            .zip(self.templates.chunks_exact_mut(width * slots))
        {
            for (&px, templates) in row.iter().zip(pixels.chunks_exact_mut(slots)) {
                templates[0] = Template::new(f32::from(px), 1.0);
            }
        }
        Ok(())
    }

    pub(crate) fn check_frame(&self, frame: ImageView<'_, u8>) -> MotionSalResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(MotionSalError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: frame.width(),
                height: frame.height(),
            });
        }
        Ok(())
    }
}
