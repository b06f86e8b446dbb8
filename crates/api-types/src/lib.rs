//! Wire types shared between hunt clients and the results service.

use serde::{Deserialize, Serialize};

/// A `[latitude, longitude]` pair, in the order map widgets expect.
pub type LatLng = [f64; 2];

/// Body of the `POST` sent once a player finishes tracing a shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// The path the player actually walked while drawing.
    pub points: Vec<LatLng>,
    /// The shape they were asked to trace.
    pub shape: Vec<LatLng>,
    pub nickname: String,
}
