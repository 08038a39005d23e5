mod backends;
mod result;
mod source;

pub use backends::{FrameRecord, RecordedDetection, ReplaySource};
pub use result::{DetectedFrame, Detection, PERSON_CLASS_NAME};
pub use source::DetectionSource;
