//! Shapes that ship with the game, drawn in playfield meters.

use std::f64::consts::FRAC_PI_4;

use geo::Point;

use crate::geometry::LocalFrame;
use crate::shape::Shape;

/// Stromovka park, Prague.
const SNOWMAN_ANCHOR: (f64, f64) = (14.4235, 50.1055);
/// Letná plain, Prague.
const SQUARE_ANCHOR: (f64, f64) = (14.4170, 50.0970);
/// Vyšehrad, Prague.
const STAR_ANCHOR: (f64, f64) = (14.4180, 50.0640);

pub fn all() -> Vec<Shape> {
    vec![snowman(), square(), star()]
}

/// Point on a circle at `step` eighths of a turn, counting from east.
fn on_circle(center: Point, radius: f64, step: i32) -> Point {
    let angle = f64::from(step) * FRAC_PI_4;
    Point::new(
        center.x() + radius * angle.cos(),
        center.y() + radius * angle.sin(),
    )
}

/// Three stacked circles drawn in one stroke: the bottom circle is looped
/// from its top, the middle one is climbed along its right side, the head
/// is looped, and the middle one's left side leads back down.
pub fn snowman() -> Shape {
    let (bottom, middle, head) = (40.0, 28.0, 18.0);
    let bottom_center = Point::new(0.0, bottom);
    let middle_center = Point::new(0.0, 2.0 * bottom + middle);
    let head_center = Point::new(0.0, 2.0 * bottom + 2.0 * middle + head);

    let mut waypoints = Vec::new();
    // top of the bottom circle, once around counter-clockwise
    waypoints.extend((2..=10).map(|step| on_circle(bottom_center, bottom, step)));
    // right side of the middle circle, bottom to top
    waypoints.extend((-1..=2).map(|step| on_circle(middle_center, middle, step)));
    // head, once around from its bottom
    waypoints.extend((-1..=6).map(|step| on_circle(head_center, head, step)));
    // left side of the middle circle, top to bottom
    waypoints.extend((3..=6).map(|step| on_circle(middle_center, middle, step)));

    shape("snowman", SNOWMAN_ANCHOR, waypoints)
}

pub fn square() -> Shape {
    let side = 60.0;
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(side, 0.0),
        Point::new(side, side),
        Point::new(0.0, side),
        Point::new(0.0, 0.0),
    ];

    shape("square", SQUARE_ANCHOR, waypoints)
}

/// Five-pointed star, starting and ending at the top point.
pub fn star() -> Shape {
    let (outer, inner) = (50.0, 20.0);
    let waypoints = (0..=10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = std::f64::consts::FRAC_PI_2 + f64::from(i) * std::f64::consts::PI / 5.0;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    shape("star", STAR_ANCHOR, waypoints)
}

fn shape(name: &str, (lon, lat): (f64, f64), waypoints: Vec<Point>) -> Shape {
    let frame = LocalFrame::new(Point::new(lon, lat));
    Shape::new(name, frame, waypoints).unwrap_or_else(|_| unreachable!("built-in shapes are non-empty"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use crate::tracer::DEFAULT_THRESHOLD;

    #[test]
    fn test_consecutive_waypoints_are_farther_apart_than_threshold() {
        for shape in all() {
            for pair in shape.waypoints().windows(2) {
                assert!(
                    distance(pair[0], pair[1]) > DEFAULT_THRESHOLD,
                    "{} has waypoints closer than the default threshold",
                    shape.name()
                );
            }
        }
    }

    #[test]
    fn test_snowman_is_one_stroke() {
        let shape = snowman();
        assert_eq!(shape.len(), 9 + 4 + 8 + 4);

        // the middle circle's right side tops out at the join with the head,
        // and the head loop begins just past it as a separate waypoint
        let top_of_middle = shape.waypoints()[12];
        let head_start = shape.waypoints()[13];
        assert!(distance(top_of_middle, head_start) > 0.0);
        assert!((top_of_middle.y() - 2.0 * 40.0 - 2.0 * 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_shapes_end_at_start() {
        assert_eq!(square().start(), square().end());
        let star = star();
        assert!(distance(star.start(), star.end()) < 1e-9);
    }
}
