use serde::Serialize;

use crate::Point;

/// Offset of a lock point from frame center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CenterOffset {
    /// `lock_point.x - frame_center.x`
    pub error_x: f64,
    /// `lock_point.y - frame_center.y`
    pub error_y: f64,
    pub distance_px: f64,
    pub inside_deadzone: bool,
}

/// Signed pixel error, Euclidean distance and deadzone gate.
///
/// The deadzone is rectangular: inside iff `|error_x| <= deadzone_x` and
/// `|error_y| <= deadzone_y`, boundary inclusive. `distance_px` is reported
/// alongside but does not participate in the gate.
pub fn compute_error(
    lock_point: Point,
    frame_center: Point,
    deadzone_x: u32,
    deadzone_y: u32,
) -> CenterOffset {
    let error_x = f64::from(lock_point.x) - f64::from(frame_center.x);
    let error_y = f64::from(lock_point.y) - f64::from(frame_center.y);
    let distance_px = error_x.hypot(error_y);
    let inside_deadzone =
        error_x.abs() <= f64::from(deadzone_x) && error_y.abs() <= f64::from(deadzone_y);

    CenterOffset {
        error_x,
        error_y,
        distance_px,
        inside_deadzone,
    }
}
