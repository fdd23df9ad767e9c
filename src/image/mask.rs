use crate::image::{required_len, ImageView};
use crate::util::MotionSalResult;

/// Frame-sized single-channel binary mask.
///
/// Pixels hold `1` for foreground and `0` for background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Mask {
    /// Creates a mask with every pixel set to `value` (normalized to 0/1).
    pub fn filled(width: usize, height: usize, value: u8) -> MotionSalResult<Self> {
        let len = required_len(width, height, width)?;
        Ok(Self {
            data: vec![u8::from(value != 0); len],
            width,
            height,
        })
    }

    /// Creates an all-foreground mask, the initial state of every pass.
    pub fn foreground(width: usize, height: usize) -> MotionSalResult<Self> {
        Self::filled(width, height, 1)
    }

    pub(crate) fn from_raw(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns true when `(x, y)` is in bounds and foreground.
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(1)
    }

    /// Returns the mask values in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Returns a borrowed view of the mask.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Expands the mask to 0/255 intensities for display or export.
    pub fn to_u8_image(&self) -> Vec<u8> {
        self.data.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Mask;

    #[test]
    fn filled_normalizes_to_binary() {
        let mask = Mask::filled(3, 2, 255).unwrap();
        assert!(mask.as_slice().iter().all(|&v| v == 1));
        assert_eq!(mask.count_foreground(), 6);
        assert_eq!(mask.get(3, 0), None);
    }

    #[test]
    fn export_scales_to_full_range() {
        let mask = Mask::from_raw(vec![0, 1, 1, 0], 2, 2);
        assert_eq!(mask.to_u8_image(), vec![0, 255, 255, 0]);
        assert!(mask.is_foreground(1, 0));
        assert!(!mask.is_foreground(1, 1));
    }

    #[test]
    fn view_borrows_rows() {
        let mask = Mask::from_raw(vec![1, 0, 0, 0, 1, 1], 3, 2);
        let view = mask.view();
        assert_eq!(view.size(), (3, 2));
        assert_eq!(view.stride(), 3);
        assert_eq!(view.row(1), Some(&[0, 1, 1][..]));
        assert_eq!(view.get(0, 0), Some(&1));
    }
}
