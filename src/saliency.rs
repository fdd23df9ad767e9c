//! Saliency algorithm interface and the motion background-model detector.

use crate::bank::{PotentialBackground, TemplateBank};
use crate::config::{Bootstrap, MotionSaliencyConfig};
use crate::detect::{
    fuse_masks, full_resolution_detection, low_resolution_detection, noise_mask,
};
use crate::image::{ImageView, Mask};
use crate::maintain::{reorder_templates, replace_templates};
use crate::trace::{trace_event, trace_span};
use crate::util::{MotionSalError, MotionSalResult};

/// Common entry point for saliency detectors.
pub trait SaliencyAlgorithm {
    /// Short identifier of the algorithm.
    fn name(&self) -> &'static str;

    /// Sizes the algorithm's internal state for `width` x `height` frames.
    fn initialize(&mut self, width: usize, height: usize) -> MotionSalResult<()>;

    /// Computes the binary saliency map (`1` = salient) for one frame.
    fn compute_saliency(&mut self, frame: ImageView<'_, u8>) -> MotionSalResult<Mask>;
}

/// Selects a saliency algorithm by configuration.
#[derive(Clone, Debug)]
pub enum SaliencyKind {
    /// Per-pixel template background model with dual-resolution matching.
    Motion(MotionSaliencyConfig),
}

/// Builds the algorithm described by `kind`.
pub fn create(kind: SaliencyKind) -> MotionSalResult<Box<dyn SaliencyAlgorithm + Send>> {
    match kind {
        SaliencyKind::Motion(cfg) => Ok(Box::new(MotionSaliency::new(cfg)?)),
    }
}

/// All masks produced for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameMasks {
    /// Per-pixel template matching result.
    pub full_resolution: Mask,
    /// Block-mean matching result at pixel resolution.
    pub low_resolution: Mask,
    /// Foreground in both passes; the saliency map.
    pub fused: Mask,
    /// Foreground at full resolution only.
    pub noise: Mask,
}

#[derive(Clone, Debug)]
struct Model {
    bank: TemplateBank,
    potential: PotentialBackground,
    seeded: bool,
}

impl Model {
    fn new(width: usize, height: usize, cfg: &MotionSaliencyConfig) -> MotionSalResult<Self> {
        Ok(Self {
            bank: TemplateBank::new(width, height, cfg.slot_count(), cfg.initial_epsilon)?,
            potential: PotentialBackground::new(width, height)?,
            seeded: false,
        })
    }
}

/// Motion saliency detector backed by a per-pixel template bank.
///
/// Each frame is classified at full and block resolution, the two masks are
/// fused, and the bank is then maintained (reorder, replace, reorder).
///
/// ```
/// use motionsal::{ImageView, MotionSaliency, MotionSaliencyConfig};
///
/// let mut detector = MotionSaliency::new(MotionSaliencyConfig::default()).unwrap();
/// detector.initialize(8, 8).unwrap();
/// let frame = vec![100u8; 64];
/// let view = ImageView::from_slice(&frame, 8, 8).unwrap();
/// let masks = detector.process_frame(view).unwrap();
/// assert_eq!(masks.fused.count_foreground(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct MotionSaliency {
    cfg: MotionSaliencyConfig,
    model: Option<Model>,
    frames: u64,
}

impl MotionSaliency {
    /// Creates an uninitialized detector after validating `cfg`.
    pub fn new(cfg: MotionSaliencyConfig) -> MotionSalResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            model: None,
            frames: 0,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MotionSaliencyConfig {
        &self.cfg
    }

    /// Replaces the configuration and drops the model; call
    /// [`initialize`](Self::initialize) again before the next frame.
    pub fn set_config(&mut self, cfg: MotionSaliencyConfig) -> MotionSalResult<()> {
        cfg.validate()?;
        self.cfg = cfg;
        self.model = None;
        self.frames = 0;
        Ok(())
    }

    /// Allocates the template bank, tolerance map, and potential background.
    pub fn initialize(&mut self, width: usize, height: usize) -> MotionSalResult<()> {
        self.model = Some(Model::new(width, height, &self.cfg)?);
        self.frames = 0;
        Ok(())
    }

    /// Re-allocates the model at its current size.
    pub fn reset(&mut self) -> MotionSalResult<()> {
        let (width, height) = self.size().ok_or(MotionSalError::NotInitialized)?;
        self.initialize(width, height)
    }

    /// Returns true once [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    /// Returns the configured frame size.
    pub fn size(&self) -> Option<(usize, usize)> {
        self.model
            .as_ref()
            .map(|m| (m.bank.width(), m.bank.height()))
    }

    /// Number of frames processed since the last initialization.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Returns the template bank.
    pub fn bank(&self) -> Option<&TemplateBank> {
        self.model.as_ref().map(|m| &m.bank)
    }

    /// Returns the template bank for manual seeding or inspection.
    pub fn bank_mut(&mut self) -> Option<&mut TemplateBank> {
        self.model.as_mut().map(|m| &mut m.bank)
    }

    /// Returns the potential background map.
    pub fn potential_background(&self) -> Option<&PotentialBackground> {
        self.model.as_ref().map(|m| &m.potential)
    }

    /// Classifies one frame and updates the model.
    ///
    /// Fails without touching any state when the detector is uninitialized or
    /// the frame size differs from the initialized size.
    pub fn process_frame(&mut self, frame: ImageView<'_, u8>) -> MotionSalResult<FrameMasks> {
        let cfg = &self.cfg;
        let model = self.model.as_mut().ok_or(MotionSalError::NotInitialized)?;
        model.bank.check_frame(frame)?;
        let _span = trace_span!("compute_saliency", frame = self.frames).entered();

        if !model.seeded {
            if cfg.bootstrap == Bootstrap::FirstFrame {
                model.bank.seed_from_frame(frame)?;
            }
            model.seeded = true;
        }

        let full_resolution = full_resolution_detection(frame, &mut model.bank, cfg)?;
        let low_resolution = low_resolution_detection(frame, &model.bank, cfg)?;
        let fused = fuse_masks(&full_resolution, &low_resolution)?;
        let noise = noise_mask(&full_resolution, &low_resolution)?;
        trace_event!(
            "frame_masks",
            fused = fused.count_foreground(),
            noise = noise.count_foreground()
        );

        reorder_templates(&mut model.bank, cfg);
        model
            .potential
            .observe(frame, &fused, model.bank.epsilon_map())?;
        replace_templates(&mut model.bank, &model.potential, &fused, cfg)?;
        reorder_templates(&mut model.bank, cfg);

        self.frames += 1;
        Ok(FrameMasks {
            full_resolution,
            low_resolution,
            fused,
            noise,
        })
    }
}

impl SaliencyAlgorithm for MotionSaliency {
    fn name(&self) -> &'static str {
        "motion-template-background"
    }

    fn initialize(&mut self, width: usize, height: usize) -> MotionSalResult<()> {
        MotionSaliency::initialize(self, width, height)
    }

    fn compute_saliency(&mut self, frame: ImageView<'_, u8>) -> MotionSalResult<Mask> {
        self.process_frame(frame).map(|masks| masks.fused)
    }
}
