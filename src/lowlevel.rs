//! Per-stage building blocks for custom pipelines.
//!
//! These functions are the stages [`MotionSaliency`](crate::MotionSaliency)
//! chains together for every frame. Most users should drive the detector
//! through `process_frame` or the [`SaliencyAlgorithm`](crate::SaliencyAlgorithm)
//! trait instead.

pub use crate::detect::{
    fuse_masks, full_resolution_detection, low_resolution_detection, noise_mask,
};
pub use crate::maintain::{
    neighborhood, order_pixel_templates, reorder_templates, replace_templates, Window,
};
