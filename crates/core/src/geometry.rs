//! Planar distance and the flat-plane projection between map coordinates
//! and a shape's playfield.
//!
//! Shapes span a few hundred meters at most, so an equirectangular
//! projection around a fixed anchor is accurate enough and keeps the
//! tracer's distance check a plain Euclidean one.

use api_types::LatLng;
use geo::{Distance, Euclidean, Point};

/// Meters per degree of longitude at the equator.
pub const METERS_PER_DEGREE_LON_AT_EQUATOR: f64 = 111_320.0;

/// Meters per degree of latitude (mean).
pub const METERS_PER_DEGREE_LAT: f64 = 110_574.0;

/// Planar Euclidean distance between the numeric components of two coordinates.
pub fn distance(a: Point, b: Point) -> f64 {
    Euclidean.distance(a, b)
}

/// Equirectangular projection anchored at a geographic point
/// (x = longitude, y = latitude). Projected coordinates are meters
/// east/north of the anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    anchor: Point,
    meters_per_degree_lon: f64,
}

impl LocalFrame {
    pub fn new(anchor: Point) -> Self {
        let meters_per_degree_lon =
            (METERS_PER_DEGREE_LON_AT_EQUATOR * anchor.y().to_radians().cos()).max(f64::EPSILON);

        Self {
            anchor,
            meters_per_degree_lon,
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Longitude/latitude to playfield meters.
    pub fn project(&self, lon_lat: Point) -> Point {
        Point::new(
            (lon_lat.x() - self.anchor.x()) * self.meters_per_degree_lon,
            (lon_lat.y() - self.anchor.y()) * METERS_PER_DEGREE_LAT,
        )
    }

    /// Playfield meters back to longitude/latitude.
    pub fn unproject(&self, position: Point) -> Point {
        Point::new(
            self.anchor.x() + position.x() / self.meters_per_degree_lon,
            self.anchor.y() + position.y() / METERS_PER_DEGREE_LAT,
        )
    }

    pub fn to_lat_lng(&self, position: Point) -> LatLng {
        let lon_lat = self.unproject(position);
        [lon_lat.y(), lon_lat.x()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(3.0, -4.0);
        let b = Point::new(-1.5, 2.25);

        assert_eq!(distance(a, b), distance(b, a));
        assert_relative_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_distance_zero_only_for_identical_points() {
        let a = Point::new(50.1, 14.4);

        assert_eq!(distance(a, a), 0.0);
        assert!(distance(a, Point::new(50.1, 14.400_000_1)) > 0.0);
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = LocalFrame::new(Point::new(14.4235, 50.1055));
        let lon_lat = Point::new(14.4251, 50.1049);

        let back = frame.unproject(frame.project(lon_lat));
        assert_relative_eq!(back.x(), lon_lat.x(), epsilon = 1e-9);
        assert_relative_eq!(back.y(), lon_lat.y(), epsilon = 1e-9);
    }

    #[test]
    fn test_frame_scale() {
        let frame = LocalFrame::new(Point::new(14.4235, 50.1055));

        // 0.001° of latitude is roughly 110 m anywhere
        let north = frame.project(Point::new(14.4235, 50.1065));
        assert_relative_eq!(north.y(), 110.574, epsilon = 1e-6);
        assert_relative_eq!(north.x(), 0.0);

        // longitude shrinks with cos(latitude)
        let east = frame.project(Point::new(14.4245, 50.1055));
        assert!(east.x() > 70.0 && east.x() < 72.0);
    }

    #[test]
    fn test_to_lat_lng_order() {
        let frame = LocalFrame::new(Point::new(14.4235, 50.1055));
        assert_eq!(frame.to_lat_lng(Point::new(0.0, 0.0)), [50.1055, 14.4235]);
    }
}
