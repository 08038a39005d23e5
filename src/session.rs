//! Per-stream tracking session.
//!
//! `TrackingSession` owns the one piece of state that crosses frames: the
//! previous `TrackingState`. Each camera stream gets its own session; sessions
//! share nothing, so independent streams can run on separate threads.

use crate::config::TrackerSettings;
use crate::detect::Detection;
use crate::tracking::{
    build_target_state, select_target_with_reason, SelectionReason, TrackingState,
};
use crate::FrameGeometry;

/// Counters over the life of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub frames_with_target: u64,
    /// Times the lock fell back to the centre-nearest person while a previous
    /// lock existed.
    pub lock_switches: u64,
}

#[derive(Debug, Clone)]
pub struct TrackingSession {
    settings: TrackerSettings,
    previous: Option<TrackingState>,
    stats: SessionStats,
}

impl TrackingSession {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            previous: None,
            stats: SessionStats::default(),
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// State carried into the next frame.
    pub fn previous(&self) -> Option<&TrackingState> {
        self.previous.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Run selection and state building for one frame and carry the result
    /// forward.
    pub fn process(
        &mut self,
        detections: &[Detection],
        geometry: FrameGeometry,
    ) -> Option<TrackingState> {
        let frame_center = geometry.center();
        let selection = select_target_with_reason(
            detections,
            frame_center,
            self.previous.as_ref(),
            self.settings.lock_persistence_radius_px(),
        );
        let state = build_target_state(
            selection.map(|selection| selection.detection),
            frame_center,
            self.settings.deadzone_x_px(),
            self.settings.deadzone_y_px(),
        );

        self.stats.frames_processed += 1;
        match (&self.previous, &state, selection.map(|s| s.reason)) {
            (None, Some(state), _) => {
                log::info!(
                    "target acquired at ({}, {})",
                    state.lock_point.x,
                    state.lock_point.y
                );
            }
            (Some(_), None, _) => log::info!("target lost"),
            (Some(previous), Some(state), Some(SelectionReason::NearestToCenter)) => {
                self.stats.lock_switches += 1;
                log::info!(
                    "lock moved beyond {:.1}px of ({}, {}); switched to ({}, {})",
                    self.settings.lock_persistence_radius_px(),
                    previous.lock_point.x,
                    previous.lock_point.y,
                    state.lock_point.x,
                    state.lock_point.y
                );
            }
            _ => {}
        }
        if state.is_some() {
            self.stats.frames_with_target += 1;
        }

        self.previous = state;
        state
    }

    /// Account for a frame that was not processed. The previous state is kept
    /// so the lock survives the gap.
    pub fn skip_frame(&mut self) {
        self.stats.frames_skipped += 1;
        log::debug!("frame skipped; holding previous lock");
    }

    /// Forget the previous lock, e.g. after tracking was paused.
    pub fn reset(&mut self) {
        if self.previous.take().is_some() {
            log::debug!("tracking session reset");
        }
    }
}
