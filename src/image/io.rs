//! Convenience helpers for loading frames and saving masks via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{Mask, OwnedImage};
use crate::util::{MotionSalError, MotionSalResult};
use std::path::Path;

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> MotionSalResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> MotionSalResult<OwnedImage> {
    let img = image::open(path).map_err(|err| MotionSalError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Writes a mask as an 8-bit PNG with foreground at 255.
pub fn save_mask_png<P: AsRef<Path>>(mask: &Mask, path: P) -> MotionSalResult<()> {
    let width = u32::try_from(mask.width()).map_err(|_| MotionSalError::InvalidDimensions {
        width: mask.width(),
        height: mask.height(),
    })?;
    let height = u32::try_from(mask.height()).map_err(|_| MotionSalError::InvalidDimensions {
        width: mask.width(),
        height: mask.height(),
    })?;
    let img = image::GrayImage::from_raw(width, height, mask.to_u8_image()).ok_or(
        MotionSalError::BufferTooSmall {
            needed: mask.width() * mask.height(),
            got: mask.as_slice().len(),
        },
    )?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|err| MotionSalError::ImageIo {
            reason: err.to_string(),
        })
}
