//! Target shapes the player has to trace.

use std::fmt;
use std::sync::Arc;

use api_types::LatLng;
use geo::Point;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::geometry::LocalFrame;

pub mod builtin;
pub mod registry;

pub use registry::ShapeRegistry;

/// Name under which a shape is registered. Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct ShapeIdentifier(Arc<str>);

impl ShapeIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ShapeIdentifier {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ShapeIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An ordered, non-empty list of waypoints in playfield meters, together
/// with the frame that places them on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    name: ShapeIdentifier,
    frame: LocalFrame,
    waypoints: Arc<[Point]>,
}

impl Shape {
    pub fn new(
        name: impl Into<ShapeIdentifier>,
        frame: LocalFrame,
        waypoints: Vec<Point>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if waypoints.is_empty() {
            return Err(ConfigurationError::EmptyShape(name));
        }

        Ok(Self {
            name,
            frame,
            waypoints: waypoints.into(),
        })
    }

    /// Build a shape from longitude/latitude waypoints, anchoring its frame
    /// at the first one.
    pub fn from_lon_lat(
        name: impl Into<ShapeIdentifier>,
        lon_lat: &[Point],
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let Some(&anchor) = lon_lat.first() else {
            return Err(ConfigurationError::EmptyShape(name));
        };

        let frame = LocalFrame::new(anchor);
        let waypoints = lon_lat.iter().map(|&p| frame.project(p)).collect();
        Self::new(name, frame, waypoints)
    }

    pub fn name(&self) -> &ShapeIdentifier {
        &self.name
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.waypoints.get(index).copied()
    }

    /// The first waypoint, where recording may be started.
    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    pub fn end(&self) -> Point {
        self.waypoints[self.waypoints.len() - 1]
    }

    pub fn to_lat_lng(&self) -> Vec<LatLng> {
        self.waypoints
            .iter()
            .map(|&p| self.frame.to_lat_lng(p))
            .collect()
    }
}
