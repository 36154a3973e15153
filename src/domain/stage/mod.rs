//! Stage module - Stage reference data and detection.

mod detector;
mod reference;

pub use detector::{
    DetectionConfidence, DetectionSource, FallbackMilestone, StageDetection, StageDetector,
    DEFAULT_FALLBACK_WINDOW_DAYS,
};
pub use reference::{StageReferenceRow, StageReferenceSet};
