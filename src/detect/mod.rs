//! Foreground classification passes.
//!
//! The full-resolution pass matches every pixel against its template bank and
//! adapts the first matching template. The low-resolution pass compares block
//! means against the leading slots without touching the bank. Fusion keeps a
//! pixel as foreground only when both passes agree.

pub(crate) mod full;
pub(crate) mod fusion;
pub(crate) mod low;

pub use full::full_resolution_detection;
pub use fusion::{fuse_masks, noise_mask};
pub use low::low_resolution_detection;
