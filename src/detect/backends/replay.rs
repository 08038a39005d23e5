//! Detection-log replay source.
//!
//! Reads JSON Lines where each line is one `FrameRecord`: the frame size plus
//! the detector output for that frame, as recorded from a live run.
//!
//! ```text
//! {"width":640,"height":480,"detections":[{"class_id":0,"class_name":"person","confidence":0.9,"bbox":[280,100,360,380]}]}
//! {"width":640,"height":480,"detections":[],"dropped":true}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. A detection with a
//! malformed box is logged and skipped; the rest of its frame is kept.

use std::fs::File;
use std::io::{BufRead, BufReader, Stdin};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::detect::result::{DetectedFrame, Detection};
use crate::detect::source::DetectionSource;
use crate::{BBox, FrameGeometry};

/// One line of a detection log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameRecord {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<RecordedDetection>,
    #[serde(default)]
    pub dropped: bool,
}

/// Detection as written by the recorder. The box is unchecked until converted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub class_id: u32,
    pub class_name: String,
    pub confidence: f32,
    pub bbox: [i32; 4],
}

impl FrameRecord {
    /// Convert into a `DetectedFrame`, dropping detections with malformed boxes.
    pub fn into_frame(self) -> DetectedFrame {
        let geometry = FrameGeometry::new(self.width, self.height);
        let detections = self
            .detections
            .into_iter()
            .filter_map(|recorded| match BBox::try_from(recorded.bbox) {
                Ok(bbox) => Some(Detection::new(
                    recorded.class_id,
                    recorded.class_name,
                    recorded.confidence,
                    bbox,
                )),
                Err(e) => {
                    log::warn!("skipping {} detection: {}", recorded.class_name, e);
                    None
                }
            })
            .collect();
        DetectedFrame {
            geometry,
            detections,
            dropped: self.dropped,
        }
    }
}

/// Replays a recorded detection log as a `DetectionSource`.
pub struct ReplaySource<R> {
    reader: R,
    line_no: usize,
    frames_read: u64,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl ReplaySource<BufReader<File>> {
    /// Open a detection log on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open detection log {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl ReplaySource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead + Send> DetectionSource for ReplaySource<R> {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn next_frame(&mut self) -> Result<Option<DetectedFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read detection log line {}", self.line_no + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let record: FrameRecord = serde_json::from_str(trimmed)
                .with_context(|| format!("invalid frame record on line {}", self.line_no))?;
            self.frames_read += 1;
            return Ok(Some(record.into_frame()));
        }
    }
}
