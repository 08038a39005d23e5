use anyhow::Result;

use super::result::DetectedFrame;

/// Source of per-frame detections.
///
/// # Boundary
///
/// This is where the camera and the object detector plug in. Model loading,
/// inference and frame capture all live behind it; the tracking core only
/// ever sees the `DetectedFrame` it returns.
pub trait DetectionSource: Send {
    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Produce the next frame's detections.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<DetectedFrame>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
