use serde::{Deserialize, Serialize};

use crate::{BBox, FrameGeometry};

/// Category label the selector acts on.
pub const PERSON_CLASS_NAME: &str = "person";

/// One detector candidate in one frame.
///
/// Carries no identity across frames; the detector does not assign track IDs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub class_name: String,
    /// Not used by the selection policy.
    pub confidence: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(class_id: u32, class_name: impl Into<String>, confidence: f32, bbox: BBox) -> Self {
        Self {
            class_id,
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }

    pub fn is_person(&self) -> bool {
        self.class_name == PERSON_CLASS_NAME
    }
}

/// Detector output for one captured frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFrame {
    pub geometry: FrameGeometry,
    pub detections: Vec<Detection>,
    /// The frame was captured but not processed (pacing drop, decode failure).
    pub dropped: bool,
}
