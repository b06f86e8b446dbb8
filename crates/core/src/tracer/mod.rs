//! The shape-tracing progress state machine.
//!
//! A [`ShapeTracer`] consumes position samples one at a time and advances
//! through the waypoints of its shape. It never reads the clock, the
//! network or the map; everything it knows arrives through
//! [`ShapeTracer::on_position`], [`ShapeTracer::start`] and
//! [`ShapeTracer::finish`].

use std::sync::Arc;

use geo::Point;

use crate::error::ConfigurationError;
use crate::geometry::distance;
use crate::shape::Shape;
use crate::submission::Submission;

mod config;
mod path;

pub use config::{DEFAULT_FUTURE_POINTS, DEFAULT_THRESHOLD, RecordingMode, TracerConfig};
pub use path::RecordedPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TracerPhase {
    /// Not recording yet.
    NotStarted,
    /// Recording, with waypoints still ahead.
    Tracing,
    /// Every waypoint has been reached; waiting for the player to finish.
    ReadyToFinish,
    /// The path has been handed off for submission. Terminal.
    Completed,
}

/// Immutable copy of the tracer state handed to renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct TracerSnapshot {
    pub phase: TracerPhase,
    pub recording: RecordingMode,
    pub target_index: usize,
    pub recorded_path: RecordedPath,
    pub drawing: bool,
    pub was_near_start: bool,
    pub last_position: Option<Point>,
    pub completed: bool,
}

pub struct ShapeTracer {
    shape: Arc<Shape>,
    config: TracerConfig,

    /// Next waypoint to reach. Never decreases.
    target_index: usize,
    /// Positions seen while drawing. Append-only.
    recorded_path: RecordedPath,
    /// Only meaningful in explicit recording mode.
    drawing: bool,
    /// Sticky once the player has been close to the first waypoint.
    was_near_start: bool,
    last_position: Option<Point>,
    completed: bool,
}

impl ShapeTracer {
    pub fn new(shape: impl Into<Arc<Shape>>, config: TracerConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            shape: shape.into(),
            config,
            target_index: 0,
            recorded_path: RecordedPath::new(),
            drawing: false,
            was_near_start: false,
            last_position: None,
            completed: false,
        })
    }

    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn recorded_path(&self) -> &RecordedPath {
        &self.recorded_path
    }

    pub fn was_near_start(&self) -> bool {
        self.was_near_start
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn all_reached(&self) -> bool {
        self.target_index == self.shape.len()
    }

    /// Whether the next sample will be appended to the recorded path.
    pub fn is_drawing(&self) -> bool {
        match self.config.recording {
            RecordingMode::Explicit => self.drawing,
            RecordingMode::Implicit => {
                !self.completed && self.target_index > 0 && !self.all_reached()
            }
        }
    }

    pub fn phase(&self) -> TracerPhase {
        let recording_done = match self.config.recording {
            RecordingMode::Explicit => self.drawing,
            RecordingMode::Implicit => true,
        };

        if self.completed {
            TracerPhase::Completed
        } else if self.all_reached() && recording_done {
            TracerPhase::ReadyToFinish
        } else if self.is_drawing() {
            TracerPhase::Tracing
        } else {
            TracerPhase::NotStarted
        }
    }

    /// Begin recording. Only possible before recording has started and
    /// once the player has been near the first waypoint; returns whether
    /// recording started.
    pub fn start(&mut self) -> bool {
        let startable = self.config.recording == RecordingMode::Explicit
            && self.phase() == TracerPhase::NotStarted
            && self.was_near_start;

        if startable {
            self.drawing = true;
            tracing::info!(shape = %self.shape.name(), "started drawing");
        }
        startable
    }

    /// Process one position sample.
    pub fn on_position(&mut self, position: Point) {
        if !self.completed {
            if self.is_drawing() {
                self.recorded_path.push(position);
            }

            // one waypoint per sample, even if the next ones are also in reach
            if let Some(target) = self.shape.get(self.target_index) {
                if distance(position, target) < self.config.threshold {
                    self.target_index += 1;
                    tracing::debug!(
                        target_index = self.target_index,
                        total = self.shape.len(),
                        "waypoint reached"
                    );
                }
            }
        }

        if !self.was_near_start && distance(position, self.shape.start()) <= self.config.threshold {
            self.was_near_start = true;
            tracing::debug!("player reached the start");
        }

        self.last_position = Some(position);
    }

    /// Stop recording once every waypoint has been reached, handing back
    /// the path for submission. Returns `None` if the shape is not done yet.
    pub fn finish(&mut self) -> Option<Submission> {
        if self.phase() != TracerPhase::ReadyToFinish {
            return None;
        }

        self.drawing = false;
        self.completed = true;
        tracing::info!(
            shape = %self.shape.name(),
            points = self.recorded_path.len(),
            "finished drawing"
        );

        Some(Submission {
            shape: Arc::clone(&self.shape),
            points: self.recorded_path.to_vec(),
        })
    }

    pub fn snapshot(&self) -> TracerSnapshot {
        TracerSnapshot {
            phase: self.phase(),
            recording: self.config.recording,
            target_index: self.target_index,
            recorded_path: self.recorded_path.clone(),
            drawing: self.is_drawing(),
            was_near_start: self.was_near_start,
            last_position: self.last_position,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LocalFrame;

    fn line_shape(points: &[(f64, f64)]) -> Shape {
        let waypoints = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Shape::new("test", LocalFrame::new(Point::new(0.0, 0.0)), waypoints).unwrap()
    }

    fn tracer(points: &[(f64, f64)], recording: RecordingMode) -> ShapeTracer {
        let config = TracerConfig {
            threshold: 10.0,
            recording,
            ..TracerConfig::default()
        };
        ShapeTracer::new(line_shape(points), config).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let tracer = tracer(&[(0.0, 0.0), (0.0, 20.0)], RecordingMode::Explicit);
        let snapshot = tracer.snapshot();

        assert_eq!(snapshot.phase, TracerPhase::NotStarted);
        assert_eq!(snapshot.target_index, 0);
        assert!(snapshot.recorded_path.is_empty());
        assert!(!snapshot.drawing);
        assert!(!snapshot.was_near_start);
        assert_eq!(snapshot.last_position, None);
        assert!(!snapshot.completed);
    }

    #[test]
    fn test_full_explicit_session() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 20.0)], RecordingMode::Explicit);

        tracer.on_position(Point::new(0.0, 0.0));
        assert_eq!(tracer.target_index(), 1);
        assert!(tracer.was_near_start());
        assert!(tracer.recorded_path().is_empty());
        assert_eq!(tracer.last_position(), Some(Point::new(0.0, 0.0)));

        assert!(tracer.start());
        assert_eq!(tracer.phase(), TracerPhase::Tracing);

        tracer.on_position(Point::new(0.0, 15.0));
        assert_eq!(tracer.target_index(), 2);
        assert_eq!(tracer.recorded_path().to_vec(), [Point::new(0.0, 15.0)]);
        assert_eq!(tracer.phase(), TracerPhase::ReadyToFinish);

        let submission = tracer.finish().unwrap();
        assert_eq!(submission.points, vec![Point::new(0.0, 15.0)]);
        assert_eq!(submission.shape.len(), 2);
        assert!(tracer.is_completed());
        assert!(!tracer.is_drawing());
        assert_eq!(tracer.phase(), TracerPhase::Completed);
    }

    #[test]
    fn test_threshold_boundary_asymmetry() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 20.0)], RecordingMode::Explicit);

        // exactly one threshold away from the start
        tracer.on_position(Point::new(0.0, 10.0));
        assert!(tracer.was_near_start());
        assert_eq!(tracer.target_index(), 0);

        tracer.on_position(Point::new(0.0, 9.999));
        assert_eq!(tracer.target_index(), 1);
    }

    #[test]
    fn test_start_requires_being_near_start() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 20.0)], RecordingMode::Explicit);

        assert!(!tracer.start());
        tracer.on_position(Point::new(50.0, 50.0));
        assert!(!tracer.start());
        assert!(!tracer.is_drawing());

        tracer.on_position(Point::new(5.0, 0.0));
        assert!(tracer.start());
        // a second start is a no-op
        assert!(!tracer.start());
    }

    #[test]
    fn test_was_near_start_is_sticky() {
        let mut tracer = tracer(&[(0.0, 0.0), (100.0, 0.0)], RecordingMode::Explicit);

        tracer.on_position(Point::new(0.0, 3.0));
        for far in [(500.0, 500.0), (-300.0, 20.0), (1e6, -1e6)] {
            tracer.on_position(Point::new(far.0, far.1));
            assert!(tracer.was_near_start());
        }
    }

    #[test]
    fn test_one_advance_per_sample() {
        // three waypoints all within reach of the origin
        let mut tracer = tracer(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], RecordingMode::Explicit);

        tracer.on_position(Point::new(1.0, 0.0));
        assert_eq!(tracer.target_index(), 1);
        tracer.on_position(Point::new(1.0, 0.0));
        assert_eq!(tracer.target_index(), 2);
        tracer.on_position(Point::new(1.0, 0.0));
        assert_eq!(tracer.target_index(), 3);
        // nothing left to reach
        tracer.on_position(Point::new(1.0, 0.0));
        assert_eq!(tracer.target_index(), 3);
    }

    #[test]
    fn test_target_index_monotonic_over_a_walk() {
        let mut tracer = tracer(
            &[(0.0, 0.0), (30.0, 0.0), (30.0, 30.0), (0.0, 30.0)],
            RecordingMode::Explicit,
        );

        let mut previous = tracer.target_index();
        for step in 0..400 {
            let t = f64::from(step) * 0.37;
            let position = Point::new(20.0 + 25.0 * t.cos(), 15.0 + 25.0 * (1.3 * t).sin());
            tracer.on_position(position);

            let current = tracer.target_index();
            assert!(current >= previous);
            assert!(current - previous <= 1);
            assert!(current <= tracer.shape().len());
            previous = current;

            if step == 50 {
                tracer.start();
            }
        }
    }

    #[test]
    fn test_path_grows_only_while_drawing() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 100.0)], RecordingMode::Explicit);

        for y in [0.0, 30.0, 40.0] {
            tracer.on_position(Point::new(0.0, y));
        }
        assert!(tracer.recorded_path().is_empty());

        assert!(tracer.start());
        for (i, y) in [50.0, 60.0, 70.0].into_iter().enumerate() {
            tracer.on_position(Point::new(0.0, y));
            assert_eq!(tracer.recorded_path().len(), i + 1);
        }
    }

    #[test]
    fn test_finish_rejected_before_last_waypoint() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 50.0)], RecordingMode::Explicit);

        assert!(tracer.finish().is_none());
        tracer.on_position(Point::new(0.0, 0.0));
        tracer.start();
        tracer.on_position(Point::new(0.0, 25.0));
        assert!(tracer.finish().is_none());
        assert!(!tracer.is_completed());
        assert!(tracer.is_drawing());
    }

    #[test]
    fn test_finish_requires_drawing_in_explicit_mode() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 20.0)], RecordingMode::Explicit);

        tracer.on_position(Point::new(0.0, 0.0));
        tracer.on_position(Point::new(0.0, 20.0));
        assert_eq!(tracer.target_index(), 2);
        assert_eq!(tracer.phase(), TracerPhase::NotStarted);
        assert!(tracer.finish().is_none());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut tracer = tracer(&[(0.0, 0.0)], RecordingMode::Explicit);

        tracer.on_position(Point::new(0.0, 0.0));
        assert!(tracer.start());
        assert!(tracer.finish().is_some());
        assert!(tracer.finish().is_none());
        assert!(!tracer.start());

        tracer.on_position(Point::new(3.0, 3.0));
        assert!(tracer.recorded_path().is_empty());
        assert_eq!(tracer.last_position(), Some(Point::new(3.0, 3.0)));
        assert_eq!(tracer.phase(), TracerPhase::Completed);
    }

    #[test]
    fn test_implicit_recording() {
        let mut tracer = tracer(&[(0.0, 0.0), (0.0, 20.0), (0.0, 40.0)], RecordingMode::Implicit);

        assert!(!tracer.start());
        tracer.on_position(Point::new(0.0, 1.0));
        assert_eq!(tracer.target_index(), 1);
        // drawing was off when this sample arrived
        assert!(tracer.recorded_path().is_empty());
        assert!(tracer.is_drawing());
        assert_eq!(tracer.phase(), TracerPhase::Tracing);

        tracer.on_position(Point::new(0.0, 19.0));
        tracer.on_position(Point::new(0.0, 38.0));
        assert_eq!(tracer.target_index(), 3);
        assert_eq!(tracer.recorded_path().len(), 2);
        assert!(!tracer.is_drawing());
        assert_eq!(tracer.phase(), TracerPhase::ReadyToFinish);

        tracer.on_position(Point::new(0.0, 45.0));
        assert_eq!(tracer.recorded_path().len(), 2);

        let submission = tracer.finish().unwrap();
        assert_eq!(submission.points.len(), 2);
        assert_eq!(tracer.phase(), TracerPhase::Completed);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TracerConfig {
            threshold: 0.0,
            ..TracerConfig::default()
        };
        assert!(ShapeTracer::new(line_shape(&[(0.0, 0.0)]), config).is_err());
    }
}
