pub mod replay;

pub use replay::{FrameRecord, RecordedDetection, ReplaySource};
