//! Overlay decisions for the rendering layer.
//!
//! Nothing here touches pixels. `plan_overlay` turns one frame's detections
//! and tracking result into an ordered list of draw operations; a renderer
//! (OpenCV, egui, a web canvas) executes them as-is.

use serde::{Deserialize, Serialize};

use crate::config::TrackerSettings;
use crate::detect::Detection;
use crate::report::format_tracking_output;
use crate::tracking::TrackingState;
use crate::{FrameGeometry, Point};

const LABEL_OFFSET_PX: i32 = 10;
const LABEL_MIN_Y: i32 = 20;
const TELEMETRY_X: i32 = 12;
const TELEMETRY_MARGIN_PX: i32 = 12;
const TELEMETRY_MIN_Y: i32 = 22;
const TELEMETRY_FONT_SCALE: f32 = 0.55;
const TELEMETRY_THICKNESS: u32 = 2;
const LOCK_LINE_THICKNESS: u32 = 1;

/// Colour in blue-green-red order, serialized as `[b, g, r]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgr(pub u8, pub u8, pub u8);

impl Bgr {
    pub const BLACK: Bgr = Bgr(0, 0, 0);
    pub const RED: Bgr = Bgr(0, 0, 255);
    pub const WHITE: Bgr = Bgr(255, 255, 255);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub non_person_box_color: Bgr,
    pub person_box_color: Bgr,
    pub target_point_color: Bgr,
    pub frame_center_color: Bgr,
    pub deadzone_color: Bgr,
    pub box_thickness: u32,
    pub locked_box_thickness: u32,
    pub label_font_scale: f32,
    pub label_thickness: u32,
    pub target_point_radius: u32,
    pub frame_center_radius: u32,
    pub deadzone_thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            non_person_box_color: Bgr::BLACK,
            person_box_color: Bgr::RED,
            target_point_color: Bgr::WHITE,
            frame_center_color: Bgr::WHITE,
            deadzone_color: Bgr::WHITE,
            box_thickness: 2,
            locked_box_thickness: 4,
            label_font_scale: 0.6,
            label_thickness: 2,
            target_point_radius: 5,
            frame_center_radius: 4,
            deadzone_thickness: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxStyle {
    pub color: Bgr,
    pub thickness: u32,
}

/// Box colour by category, emphasis for the locked target.
///
/// The locked detection is recognised by box equality with the state's bbox.
pub fn detection_style(
    detection: &Detection,
    state: Option<&TrackingState>,
    style: &OverlayStyle,
) -> BoxStyle {
    let color = if detection.is_person() {
        style.person_box_color
    } else {
        style.non_person_box_color
    };
    let is_locked = state.is_some_and(|state| state.bbox == detection.bbox);
    let thickness = if is_locked {
        style.locked_box_thickness
    } else {
        style.box_thickness
    };
    BoxStyle { color, thickness }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        color: Bgr,
        thickness: u32,
    },
    FilledCircle {
        center: Point,
        radius: u32,
        color: Bgr,
    },
    Line {
        from: Point,
        to: Point,
        color: Bgr,
        thickness: u32,
    },
    Text {
        origin: Point,
        text: String,
        font_scale: f32,
        color: Bgr,
        thickness: u32,
    },
}

/// Ordered draw list for one frame.
///
/// Deadzone rectangle, frame-center dot, each detection box with its label,
/// then the lock dot and center-to-lock line when a target exists, and the
/// telemetry line last.
pub fn plan_overlay(
    geometry: FrameGeometry,
    detections: &[Detection],
    state: Option<&TrackingState>,
    settings: &TrackerSettings,
    style: &OverlayStyle,
) -> Vec<DrawOp> {
    let center = geometry.center();
    let dx = i32::try_from(settings.deadzone_x_px()).unwrap_or(i32::MAX);
    let dy = i32::try_from(settings.deadzone_y_px()).unwrap_or(i32::MAX);
    let mut ops = Vec::with_capacity(detections.len() * 2 + 5);

    ops.push(DrawOp::Rectangle {
        top_left: Point::new(center.x.saturating_sub(dx), center.y.saturating_sub(dy)),
        bottom_right: Point::new(center.x.saturating_add(dx), center.y.saturating_add(dy)),
        color: style.deadzone_color,
        thickness: style.deadzone_thickness,
    });
    ops.push(DrawOp::FilledCircle {
        center,
        radius: style.frame_center_radius,
        color: style.frame_center_color,
    });

    for detection in detections {
        let box_style = detection_style(detection, state, style);
        let bbox = &detection.bbox;
        ops.push(DrawOp::Rectangle {
            top_left: bbox.top_left(),
            bottom_right: bbox.bottom_right(),
            color: box_style.color,
            thickness: box_style.thickness,
        });
        ops.push(DrawOp::Text {
            origin: Point::new(
                bbox.x1(),
                bbox.y1().saturating_sub(LABEL_OFFSET_PX).max(LABEL_MIN_Y),
            ),
            text: format!("{} {:.2}", detection.class_name, detection.confidence),
            font_scale: style.label_font_scale,
            color: box_style.color,
            thickness: style.label_thickness,
        });
    }

    if let Some(state) = state {
        ops.push(DrawOp::FilledCircle {
            center: state.lock_point,
            radius: style.target_point_radius,
            color: style.target_point_color,
        });
        ops.push(DrawOp::Line {
            from: center,
            to: state.lock_point,
            color: style.target_point_color,
            thickness: LOCK_LINE_THICKNESS,
        });
    }

    let height = i32::try_from(geometry.height).unwrap_or(i32::MAX);
    ops.push(DrawOp::Text {
        origin: Point::new(
            TELEMETRY_X,
            height.saturating_sub(TELEMETRY_MARGIN_PX).max(TELEMETRY_MIN_Y),
        ),
        text: format_tracking_output(state),
        font_scale: TELEMETRY_FONT_SCALE,
        color: style.target_point_color,
        thickness: TELEMETRY_THICKNESS,
    });

    ops
}
