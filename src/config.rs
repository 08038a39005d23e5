use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::TrackingError;
use crate::overlay::OverlayStyle;

const DEFAULT_DEADZONE_X_PX: i64 = 30;
const DEFAULT_DEADZONE_Y_PX: i64 = 30;
const DEFAULT_PERSISTENCE_RADIUS_PX: f64 = 80.0;
const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_FRAME_RATE: f64 = 10.0;
const MIN_FRAME_RATE: f64 = 0.1;

#[derive(Debug, Deserialize, Default)]
struct VisionConfigFile {
    tracking: Option<TrackingConfigFile>,
    detector: Option<DetectorConfigFile>,
    frame_rate: Option<f64>,
    overlay: Option<OverlayStyle>,
}

#[derive(Debug, Deserialize, Default)]
struct TrackingConfigFile {
    deadzone_x_px: Option<i64>,
    deadzone_y_px: Option<i64>,
    lock_persistence_radius_px: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    confidence_threshold: Option<f32>,
}

/// Validated numbers the tracking core runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    deadzone_x_px: u32,
    deadzone_y_px: u32,
    lock_persistence_radius_px: f64,
}

impl TrackerSettings {
    /// Reject negative or out-of-range deadzones and a negative or non-finite
    /// persistence radius. Nothing is re-checked per frame.
    pub fn new(
        deadzone_x_px: i64,
        deadzone_y_px: i64,
        lock_persistence_radius_px: f64,
    ) -> Result<Self, TrackingError> {
        let deadzone_x_px = deadzone_half_width("deadzone_x_px", deadzone_x_px)?;
        let deadzone_y_px = deadzone_half_width("deadzone_y_px", deadzone_y_px)?;
        if !lock_persistence_radius_px.is_finite() || lock_persistence_radius_px < 0.0 {
            return Err(TrackingError::InvalidConfiguration(format!(
                "lock_persistence_radius_px must be a finite non-negative number, got {lock_persistence_radius_px}"
            )));
        }
        Ok(Self {
            deadzone_x_px,
            deadzone_y_px,
            lock_persistence_radius_px,
        })
    }

    pub fn deadzone_x_px(&self) -> u32 {
        self.deadzone_x_px
    }

    pub fn deadzone_y_px(&self) -> u32 {
        self.deadzone_y_px
    }

    pub fn lock_persistence_radius_px(&self) -> f64 {
        self.lock_persistence_radius_px
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            deadzone_x_px: DEFAULT_DEADZONE_X_PX as u32,
            deadzone_y_px: DEFAULT_DEADZONE_Y_PX as u32,
            lock_persistence_radius_px: DEFAULT_PERSISTENCE_RADIUS_PX,
        }
    }
}

fn deadzone_half_width(name: &str, value: i64) -> Result<u32, TrackingError> {
    u32::try_from(value).map_err(|_| {
        TrackingError::InvalidConfiguration(format!(
            "{name} must be between 0 and {}, got {value}",
            u32::MAX
        ))
    })
}

/// Application configuration: tracker numbers plus detector/pacing/overlay
/// settings of the surrounding loop.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub tracking: TrackerSettings,
    /// Detections below this confidence never reach the selector.
    pub confidence_threshold: f32,
    pub frame_rate: f64,
    pub overlay: OverlayStyle,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            tracking: TrackerSettings::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            frame_rate: DEFAULT_FRAME_RATE,
            overlay: OverlayStyle::default(),
        }
    }
}

impl VisionConfig {
    /// Load from `TARGET_LOCK_CONFIG` (if set), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("TARGET_LOCK_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (or defaults), then apply env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => VisionConfigFile::default(),
        };
        apply_env(&mut file_cfg)?;
        Self::from_file(file_cfg)
    }

    /// Load from a file only; the environment is not consulted.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_file(read_config_file(path)?)
    }

    fn from_file(file: VisionConfigFile) -> Result<Self> {
        let tracking_file = file.tracking.unwrap_or_default();
        let tracking = TrackerSettings::new(
            tracking_file.deadzone_x_px.unwrap_or(DEFAULT_DEADZONE_X_PX),
            tracking_file.deadzone_y_px.unwrap_or(DEFAULT_DEADZONE_Y_PX),
            tracking_file
                .lock_persistence_radius_px
                .unwrap_or(DEFAULT_PERSISTENCE_RADIUS_PX),
        )?;
        let confidence_threshold = file
            .detector
            .and_then(|detector| detector.confidence_threshold)
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        let cfg = Self {
            tracking,
            confidence_threshold,
            frame_rate: file.frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
            overlay: file.overlay.unwrap_or_default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence_threshold must be within 0..=1, got {}",
                self.confidence_threshold
            ));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(anyhow!(
                "frame_rate must be a positive number, got {}",
                self.frame_rate
            ));
        }
        Ok(())
    }

    /// Target time per frame, `1 / max(frame_rate, 0.1)` seconds.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(MIN_FRAME_RATE))
    }
}

fn apply_env(file: &mut VisionConfigFile) -> Result<()> {
    let tracking = file.tracking.get_or_insert_with(Default::default);
    if let Some(value) = env_value::<i64>("TARGET_LOCK_DEADZONE_X_PX")? {
        tracking.deadzone_x_px = Some(value);
    }
    if let Some(value) = env_value::<i64>("TARGET_LOCK_DEADZONE_Y_PX")? {
        tracking.deadzone_y_px = Some(value);
    }
    if let Some(value) = env_value::<f64>("TARGET_LOCK_PERSISTENCE_RADIUS_PX")? {
        tracking.lock_persistence_radius_px = Some(value);
    }
    if let Some(value) = env_value::<f32>("TARGET_LOCK_CONFIDENCE")? {
        file.detector
            .get_or_insert_with(Default::default)
            .confidence_threshold = Some(value);
    }
    if let Some(value) = env_value::<f64>("TARGET_LOCK_FRAME_RATE")? {
        file.frame_rate = Some(value);
    }
    Ok(())
}

fn env_value<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(None),
    }
}

fn read_config_file(path: &Path) -> Result<VisionConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
