use serde::Serialize;

use super::lock_point::compute_lock_point;
use super::offset::compute_error;
use crate::detect::Detection;
use crate::{BBox, Point};

/// Per-frame tracking result.
///
/// Exists only for frames where a person was selected; "no target" is `None`,
/// not an error. Built fresh each frame by `build_target_state` and never
/// mutated. The previous frame's value is fed back into target selection and
/// then discarded, so exactly one frame of history is kept.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackingState {
    pub lock_point: Point,
    /// Box of the selected detection; used for box emphasis when rendering.
    pub bbox: BBox,
    pub error_x: f64,
    pub error_y: f64,
    pub distance_px: f64,
    pub inside_deadzone: bool,
}

/// Assemble the frame's `TrackingState` from the selected detection.
///
/// Returns `None` when nothing was selected. Callers must pass the result back
/// as the previous state on the next frame (and `None` on the first frame or
/// after a tracking gap).
pub fn build_target_state(
    selected: Option<&Detection>,
    frame_center: Point,
    deadzone_x: u32,
    deadzone_y: u32,
) -> Option<TrackingState> {
    let selected = selected?;
    let lock_point = compute_lock_point(&selected.bbox);
    let offset = compute_error(lock_point, frame_center, deadzone_x, deadzone_y);

    Some(TrackingState {
        lock_point,
        bbox: selected.bbox,
        error_x: offset.error_x,
        error_y: offset.error_y,
        distance_px: offset.distance_px,
        inside_deadzone: offset.inside_deadzone,
    })
}
