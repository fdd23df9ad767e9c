//! Error types for motionsal.

use thiserror::Error;

/// Result alias for motionsal operations.
pub type Result<T> = std::result::Result<T, MotionSalError>;

/// Errors reported by the background model and its frame adapters.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MotionSalError {
    /// A frame was submitted before the model was sized with `initialize`.
    #[error("background model is not initialized")]
    NotInitialized,
    /// The frame size differs from the size the model was initialized with.
    #[error(
        "frame is {width}x{height}, model expects {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
    /// A configuration parameter is out of its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared layout.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Decoding or encoding an image file failed.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
