//! Error types shared across the crate.

use crate::position::{PositionError, PositionSourceKind};
use crate::shape::ShapeIdentifier;
use crate::submission::SubmissionError;

/// A session could not be set up as requested. Always fatal to the session.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeIdentifier),

    #[error("Shape {0} has no waypoints")]
    EmptyShape(ShapeIdentifier),

    #[error("Invalid threshold {0}: must be a positive, finite distance")]
    InvalidThreshold(f64),

    #[error("Invalid shape file: {0}")]
    InvalidShapeFile(String),

    #[error("{0:?} positions are disabled for this session")]
    SourceDisabled(PositionSourceKind),
}

#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Position unavailable: {0}")]
    PositionUnavailable(#[from] PositionError),

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Session is no longer running")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, TracerError>;
