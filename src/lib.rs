//! Motion saliency detection with a per-pixel template background model.
//!
//! Every pixel keeps a small bank of `(value, efficacy)` templates. Frames are
//! classified at full resolution and on block means, the two masks are fused
//! into the saliency map, and the bank is maintained by efficacy ordering and
//! by replacing weak templates with validated new backgrounds. Row-parallel
//! stages are available with the `rayon` feature.

pub mod bank;
pub mod config;
mod detect;
pub mod image;
pub mod lowlevel;
mod maintain;
pub mod saliency;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;

pub use bank::{BackgroundCandidate, PotentialBackground, Template, TemplateBank};
pub use config::{BlockRemainder, Bootstrap, MismatchDecay, MotionSaliencyConfig};
pub use image::{ImageView, Mask, OwnedImage};
pub use saliency::{create, FrameMasks, MotionSaliency, SaliencyAlgorithm, SaliencyKind};
pub use util::{MotionSalError, MotionSalResult};
