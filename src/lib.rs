//! Target Lock
//!
//! Decision core of a camera targeting overlay. Given the person detections of
//! one frame, pick "the" target, estimate a stable lock point on it and report
//! its offset from frame center against a rectangular deadzone.
//!
//! # Architecture
//!
//! Per frame:
//!
//! 1. **Select**: filter to persons, prefer the detection nearest the previous
//!    lock point (within the persistence radius), else the one nearest center.
//! 2. **Lock point**: horizontal center, upper third of the box.
//! 3. **Offset**: signed error from frame center, distance, deadzone gate.
//! 4. **State**: the resulting `TrackingState` is threaded by the caller into
//!    the next frame. Nothing else crosses frame boundaries.
//!
//! Identity across frames is positional only. There are no track IDs and no
//! appearance matching; layer a real multi-object tracker on top if needed.
//!
//! # Module Structure
//!
//! - `detect`: detection records and the detector seam
//! - `tracking`: lock point, selection, offset, `TrackingState`
//! - `session`: per-stream owner of the carried-forward state
//! - `runner`: drives a `DetectionSource` through a session
//! - `config`, `report`, `overlay`: application plumbing

use serde::{Deserialize, Serialize};

pub mod config;
pub mod detect;
pub mod error;
pub mod overlay;
pub mod report;
pub mod runner;
pub mod session;
pub mod tracking;

pub use config::{TrackerSettings, VisionConfig};
pub use detect::{
    DetectedFrame, Detection, DetectionSource, FrameRecord, RecordedDetection, ReplaySource,
    PERSON_CLASS_NAME,
};
pub use error::TrackingError;
pub use overlay::{detection_style, plan_overlay, Bgr, BoxStyle, DrawOp, OverlayStyle};
pub use report::format_tracking_output;
pub use runner::{FrameOutcome, FrameRunner};
pub use session::{SessionStats, TrackingSession};
pub use tracking::{
    build_target_state, compute_error, compute_lock_point, select_target,
    select_target_with_reason, CenterOffset, Selection, SelectionReason, TrackingState,
};

// -------------------- Geometry --------------------

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box `(x1, y1, x2, y2)` in integer pixels.
///
/// Always satisfies `x1 <= x2` and `y1 <= y2`. Malformed boxes are rejected at
/// construction (and at deserialization) rather than normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct BBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl BBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, TrackingError> {
        if x1 > x2 || y1 > y2 {
            return Err(TrackingError::InvalidInput(format!(
                "malformed bounding box ({x1}, {y1}, {x2}, {y2}): expected x1 <= x2 and y1 <= y2"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn x2(&self) -> i32 {
        self.x2
    }

    pub fn y2(&self) -> i32 {
        self.y2
    }

    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn as_array(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl TryFrom<[i32; 4]> for BBox {
    type Error = TrackingError;

    fn try_from([x1, y1, x2, y2]: [i32; 4]) -> Result<Self, Self::Error> {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<BBox> for [i32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.as_array()
    }
}

/// Frame dimensions as reported by the camera layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `(width / 2, height / 2)`, integer division.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_rejects_inverted_axes() {
        assert!(matches!(
            BBox::new(10, 0, 5, 10),
            Err(TrackingError::InvalidInput(_))
        ));
        assert!(matches!(
            BBox::new(0, 10, 5, 9),
            Err(TrackingError::InvalidInput(_))
        ));
    }

    #[test]
    fn bbox_accepts_zero_area() {
        let bbox = BBox::new(7, 7, 7, 7).unwrap();
        assert_eq!(bbox.width(), 0);
        assert_eq!(bbox.height(), 0);
    }

    #[test]
    fn bbox_deserializes_through_validation() {
        let ok: BBox = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(ok.as_array(), [1, 2, 3, 4]);
        assert!(serde_json::from_str::<BBox>("[3, 2, 1, 4]").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "[1,2,3,4]");
    }

    #[test]
    fn frame_center_uses_integer_division() {
        assert_eq!(FrameGeometry::new(640, 480).center(), Point::new(320, 240));
        assert_eq!(FrameGeometry::new(641, 481).center(), Point::new(320, 240));
    }

    #[test]
    fn point_distance_is_euclidean() {
        assert_eq!(Point::new(0, 0).distance_to(Point::new(3, 4)), 5.0);
    }
}
