use thiserror::Error;

/// Error kinds raised by the tracking core.
///
/// Per-frame operations never fail; these only surface when constructing
/// inputs (boxes) or settings.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TrackingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
