use anyhow::Result;

use crate::detect::{DetectedFrame, Detection, DetectionSource};
use crate::session::TrackingSession;
use crate::tracking::TrackingState;
use crate::FrameGeometry;

/// Result of one `FrameRunner::step`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutcome {
    /// Zero-based position in the source, dropped frames included.
    pub index: u64,
    pub geometry: FrameGeometry,
    /// Detections that passed the confidence threshold.
    pub detections: Vec<Detection>,
    /// For a skipped frame, the lock held over from before the gap.
    pub state: Option<TrackingState>,
    pub skipped: bool,
}

/// Pulls frames from a `DetectionSource` and feeds them through a session.
///
/// Applies the detector-side confidence threshold before selection, since
/// recorded or remote detectors may report below it.
pub struct FrameRunner {
    session: TrackingSession,
    confidence_threshold: f32,
    next_index: u64,
}

impl FrameRunner {
    pub fn new(session: TrackingSession, confidence_threshold: f32) -> Self {
        Self {
            session,
            confidence_threshold,
            next_index: 0,
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Process the next frame. `Ok(None)` once the source is exhausted.
    pub fn step(&mut self, source: &mut dyn DetectionSource) -> Result<Option<FrameOutcome>> {
        let Some(frame) = source.next_frame()? else {
            return Ok(None);
        };
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(self.apply(index, frame)))
    }

    fn apply(&mut self, index: u64, frame: DetectedFrame) -> FrameOutcome {
        let DetectedFrame {
            geometry,
            detections,
            dropped,
        } = frame;

        if dropped {
            self.session.skip_frame();
            return FrameOutcome {
                index,
                geometry,
                detections: Vec::new(),
                state: self.session.previous().copied(),
                skipped: true,
            };
        }

        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|det| det.confidence >= self.confidence_threshold)
            .collect();
        let state = self.session.process(&detections, geometry);
        FrameOutcome {
            index,
            geometry,
            detections,
            state,
            skipped: false,
        }
    }
}
