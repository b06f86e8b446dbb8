//! Types crossing the FFI boundary.

use treasure_hunt_core::{
    ConfigurationError, PositionError, PositionSourceKind, RecordingMode, TracerConfig,
    TracerError, TracerPhase,
};

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum TreasureHuntError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Runtime(String),

    #[error("Session is no longer running")]
    SessionClosed,
}

impl From<TracerError> for TreasureHuntError {
    fn from(error: TracerError) -> Self {
        match error {
            TracerError::SessionClosed => Self::SessionClosed,
            TracerError::Configuration(error) => Self::Configuration(error.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

impl From<ConfigurationError> for TreasureHuntError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub(crate) fn to_point(self) -> geo::Point {
        geo::Point::new(self.longitude, self.latitude)
    }

    pub(crate) fn from_point(lon_lat: geo::Point) -> Self {
        Self {
            latitude: lon_lat.y(),
            longitude: lon_lat.x(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Enum)]
pub enum PositionInput {
    Geolocation,
    /// Taps and drags on the map, for testing indoors.
    Pointer,
}

impl From<PositionInput> for PositionSourceKind {
    fn from(input: PositionInput) -> Self {
        match input {
            PositionInput::Geolocation => PositionSourceKind::Geolocation,
            PositionInput::Pointer => PositionSourceKind::Pointer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Enum)]
pub enum Recording {
    Explicit,
    Implicit,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct HuntConfig {
    pub shape: String,
    pub nickname: String,
    pub endpoint: Option<String>,
    pub threshold_meters: f64,
    pub future_points: u32,
    pub recording: Recording,
    pub position_input: PositionInput,
    /// Extra shapes as a GeoJSON FeatureCollection of named LineStrings.
    pub custom_shapes_geojson: Option<String>,
}

impl HuntConfig {
    pub(crate) fn tracer_config(&self) -> TracerConfig {
        TracerConfig {
            threshold: self.threshold_meters,
            future_points: self.future_points as usize,
            recording: match self.recording {
                Recording::Explicit => RecordingMode::Explicit,
                Recording::Implicit => RecordingMode::Implicit,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum LocationFailure {
    Unsupported,
    PermissionDenied,
    Other { message: String },
}

impl From<LocationFailure> for PositionError {
    fn from(failure: LocationFailure) -> Self {
        match failure {
            LocationFailure::Unsupported => PositionError::Unsupported,
            LocationFailure::PermissionDenied => PositionError::PermissionDenied,
            LocationFailure::Other { message } => PositionError::Other(message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Enum)]
pub enum HuntPhase {
    NotStarted,
    Tracing,
    ReadyToFinish,
    Completed,
}

impl From<TracerPhase> for HuntPhase {
    fn from(phase: TracerPhase) -> Self {
        match phase {
            TracerPhase::NotStarted => HuntPhase::NotStarted,
            TracerPhase::Tracing => HuntPhase::Tracing,
            TracerPhase::ReadyToFinish => HuntPhase::ReadyToFinish,
            TracerPhase::Completed => HuntPhase::Completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct HuntSnapshot {
    pub phase: HuntPhase,
    pub target_index: u32,
    pub waypoint_count: u32,
    pub traced_path: Vec<LatLng>,
    pub drawing: bool,
    pub was_near_start: bool,
    pub last_position: Option<LatLng>,
    pub completed: bool,
    pub location_error: Option<String>,
    /// Banner keys, e.g. `near_end`, for the host to localize.
    pub banners: Vec<String>,
}
