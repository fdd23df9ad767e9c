//! Secondary single-hypothesis model that accumulates evidence for a new
//! background value at pixels currently classified as foreground.

use crate::image::{ImageView, Mask};
use crate::util::math::within;
use crate::util::{MotionSalError, MotionSalResult};

/// Replacement candidate for one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundCandidate {
    /// Candidate background intensity.
    pub value: f32,
    /// Evidence counter; zero means no candidate has been seeded.
    pub counter: f32,
}

impl BackgroundCandidate {
    /// Folds one foreground observation into the candidate.
    #[inline]
    pub fn observe(&mut self, pixel: f32, epsilon: f32) {
        if self.counter == 0.0 {
            self.value = pixel;
            self.counter = 1.0;
        } else if within(pixel, self.value, epsilon) {
            self.counter += 1.0;
        } else {
            self.counter -= 1.0;
        }
    }
}

/// Frame-sized map of [`BackgroundCandidate`]s.
#[derive(Clone, Debug)]
pub struct PotentialBackground {
    width: usize,
    height: usize,
    cells: Vec<BackgroundCandidate>,
}

impl PotentialBackground {
    /// Allocates a map with every counter at zero.
    pub fn new(width: usize, height: usize) -> MotionSalResult<Self> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(MotionSalError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![BackgroundCandidate::default(); len],
        })
    }

    /// Returns the map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the candidate at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<BackgroundCandidate> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Overwrites the candidate at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the map.
    pub fn set(&mut self, x: usize, y: usize, candidate: BackgroundCandidate) {
        self.cells[y * self.width + x] = candidate;
    }

    /// Returns all candidates in row-major order.
    pub fn as_slice(&self) -> &[BackgroundCandidate] {
        &self.cells
    }

    /// Updates the candidates of every foreground pixel of `fused`.
    ///
    /// Background pixels keep their value and counter untouched. The frame,
    /// mask and tolerance map must all match the map size; otherwise nothing
    /// is updated and an error is returned.
    pub fn observe(
        &mut self,
        frame: ImageView<'_, u8>,
        fused: &Mask,
        epsilon: &[f32],
    ) -> MotionSalResult<()> {
        let (width, height) = (self.width, self.height);
        for (w, h) in [frame.size(), (fused.width(), fused.height())] {
            if (w, h) != (width, height) {
                return Err(MotionSalError::DimensionMismatch {
                    expected_width: width,
                    expected_height: height,
                    width: w,
                    height: h,
                });
            }
        }
        if epsilon.len() != self.cells.len() {
            return Err(MotionSalError::BufferTooSmall {
                needed: self.cells.len(),
                got: epsilon.len(),
            });
        }
        for (y, row) in frame.rows().enumerate() {
            let start = y * width;
            let mask_row = &fused.as_slice()[start..start + width];
            let eps_row = &epsilon[start..start + width];
            let cells = &mut self.cells[start..start + width];
            for ((cell, &fg), (&px, &eps)) in cells
                .iter_mut()
                .zip(mask_row)
                .zip(row.iter().zip(eps_row))
            {
                if fg == 1 {
                    cell.observe(f32::from(px), eps);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BackgroundCandidate;

    #[test]
    fn candidate_seeds_then_counts() {
        let mut cand = BackgroundCandidate::default();
        cand.observe(120.0, 48.5);
        assert_eq!(cand, BackgroundCandidate { value: 120.0, counter: 1.0 });
        cand.observe(130.0, 48.5);
        assert_eq!(cand.counter, 2.0);
        cand.observe(250.0, 48.5);
        assert_eq!(cand.counter, 1.0);
        assert_eq!(cand.value, 120.0);
    }

    #[test]
    fn exhausted_candidate_reseeds() {
        let mut cand = BackgroundCandidate { value: 10.0, counter: 1.0 };
        cand.observe(200.0, 48.5);
        assert_eq!(cand.counter, 0.0);
        cand.observe(200.0, 48.5);
        assert_eq!(cand, BackgroundCandidate { value: 200.0, counter: 1.0 });
    }
}
