use serde::Deserialize;

use crate::error::ConfigurationError;

/// Distance below which a waypoint counts as reached, in playfield meters.
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// How many upcoming segments the map draws ahead of the player.
pub const DEFAULT_FUTURE_POINTS: usize = 4;

/// When the traced path is recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    /// The player presses start near the first waypoint and finish after the last.
    #[default]
    Explicit,
    /// Recording runs on its own between reaching the first and the last waypoint.
    Implicit,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    pub threshold: f64,
    pub future_points: usize,
    pub recording: RecordingMode,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            future_points: DEFAULT_FUTURE_POINTS,
            recording: RecordingMode::default(),
        }
    }
}

impl TracerConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigurationError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}
