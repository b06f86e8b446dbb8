//! What the map should show for a given snapshot.
//!
//! The view is derived from a [`SessionSnapshot`] and never feeds back into
//! the session.

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::geometry::LocalFrame;
use crate::session::SessionSnapshot;
use crate::shape::Shape;
use crate::tracer::{RecordingMode, TracerPhase};

/// Contextual messages shown over the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Banner {
    /// Walk to the first waypoint to begin.
    ApproachStart,
    /// Close enough to the start; recording can be started.
    ReadyToStart,
    /// All waypoints reached; recording can be finished.
    NearEnd,
    Completed,
    PositionUnavailable,
}

impl Banner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Banner::ApproachStart => "approach_start",
            Banner::ReadyToStart => "ready_to_start",
            Banner::NearEnd => "near_end",
            Banner::Completed => "completed",
            Banner::PositionUnavailable => "position_unavailable",
        }
    }
}

/// Map layers in playfield meters.
#[derive(Clone, Debug, PartialEq)]
pub struct TracerView {
    /// The shape up to and including the waypoint being approached.
    pub reached_outline: Vec<Point>,
    /// The next few segments past the one being approached.
    pub upcoming_outline: Vec<Point>,
    pub traced_path: Vec<Point>,
    pub position: Option<Point>,
    /// Shown until the first waypoint is reached.
    pub start_marker: Option<Point>,
    pub finish_marker: Point,
    pub banners: Vec<Banner>,
    frame: LocalFrame,
}

impl TracerView {
    pub fn build(shape: &Shape, snapshot: &SessionSnapshot, future_points: usize) -> Self {
        let tracer = &snapshot.tracer;
        let waypoints = shape.waypoints();
        let target = tracer.target_index;

        let reached_outline = waypoints[..(target + 1).min(waypoints.len())].to_vec();
        let upcoming_outline = if target < waypoints.len() && future_points > 0 {
            let end = (target + future_points + 1).min(waypoints.len());
            waypoints[target..end].to_vec()
        } else {
            Vec::new()
        };

        let mut banners = Vec::new();
        if snapshot.position_error.is_some() {
            banners.push(Banner::PositionUnavailable);
        }
        match tracer.phase {
            TracerPhase::Completed => banners.push(Banner::Completed),
            TracerPhase::ReadyToFinish => banners.push(Banner::NearEnd),
            TracerPhase::NotStarted if !tracer.was_near_start => banners.push(Banner::ApproachStart),
            TracerPhase::NotStarted if tracer.recording == RecordingMode::Explicit => {
                banners.push(Banner::ReadyToStart)
            }
            _ => {}
        }

        Self {
            reached_outline,
            upcoming_outline,
            traced_path: tracer.recorded_path.to_vec(),
            position: tracer.last_position,
            start_marker: (target == 0).then(|| shape.start()),
            finish_marker: shape.end(),
            banners,
            frame: *shape.frame(),
        }
    }

    /// All layers as one collection in longitude/latitude. Each feature
    /// carries a `layer` property; banners go in a top-level `banners`
    /// member.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();

        for (layer, line) in [
            ("reached", &self.reached_outline),
            ("upcoming", &self.upcoming_outline),
            ("traced", &self.traced_path),
        ] {
            if line.len() >= 2 {
                let coordinates = line.iter().map(|&p| self.position_of(p)).collect();
                features.push(feature(layer, Value::LineString(coordinates)));
            }
        }

        for (layer, point) in [
            ("position", self.position),
            ("start", self.start_marker),
            ("finish", Some(self.finish_marker)),
        ] {
            if let Some(point) = point {
                features.push(feature(layer, Value::Point(self.position_of(point))));
            }
        }

        let mut members = JsonObject::new();
        members.insert(
            "banners".to_string(),
            serde_json::json!(self.banners.iter().map(Banner::as_str).collect::<Vec<_>>()),
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(members),
        }
    }

    fn position_of(&self, point: Point) -> Vec<f64> {
        let lon_lat = self.frame.unproject(point);
        vec![lon_lat.x(), lon_lat.y()]
    }
}

fn feature(layer: &str, value: Value) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("layer".to_string(), serde_json::json!(layer));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
