use crate::tracking::TrackingState;

/// One-line telemetry for a frame.
///
/// `"No person target"` without a target, otherwise
/// `"dx=+30.0 dy=-30.0 dist=42.4px CENTERED"` (or `OFF-CENTER`).
pub fn format_tracking_output(state: Option<&TrackingState>) -> String {
    let Some(state) = state else {
        return "No person target".to_string();
    };
    let status = if state.inside_deadzone {
        "CENTERED"
    } else {
        "OFF-CENTER"
    };
    format!(
        "dx={:+.1} dy={:+.1} dist={:.1}px {}",
        state.error_x, state.error_y, state.distance_px, status
    )
}
