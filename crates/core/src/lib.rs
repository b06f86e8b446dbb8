//! # treasure-hunt-core
//!
//! Tracks a player walking the outline of a shape drawn on the map.
//!
//! ## Features
//!
//! - **Progress state machine**: waypoints are reached one by one within a
//!   distance threshold, and the walked path is recorded while drawing
//! - **Shape registry**: built-in shapes plus GeoJSON-defined ones
//! - **Sessions**: a single task per player that serializes position
//!   samples, start and finish, and publishes snapshots for rendering
//! - **Pluggable IO**: position sources and result submission are traits
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use geo::Point;
//! use treasure_hunt_core::prelude::*;
//!
//! let shape = Shape::new(
//!     "line",
//!     LocalFrame::new(Point::new(14.42, 50.10)),
//!     vec![Point::new(0.0, 0.0), Point::new(0.0, 20.0)],
//! )?;
//! let mut tracer = ShapeTracer::new(Arc::new(shape), TracerConfig::default())?;
//!
//! tracer.on_position(Point::new(0.0, 0.0));
//! assert!(tracer.start());
//! tracer.on_position(Point::new(0.0, 15.0));
//! assert_eq!(tracer.phase(), TracerPhase::ReadyToFinish);
//!
//! let submission = tracer.finish().unwrap();
//! assert_eq!(submission.points, vec![Point::new(0.0, 15.0)]);
//! # Ok::<(), ConfigurationError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod position;
pub mod session;
pub mod shape;
pub mod submission;
pub mod tracer;
pub mod view;

pub use api_types;

pub mod prelude {
    pub use crate::error::{ConfigurationError, TracerError};
    pub use crate::geometry::{LocalFrame, distance};
    pub use crate::position::{
        ChannelPositionSource, PositionError, PositionSender, PositionSource,
        PositionSourceKind, ReplayPositionSource, position_channel,
    };
    pub use crate::session::{
        PositionSubscription, Session, SessionConfig, SessionHandle, SessionSnapshot,
    };
    pub use crate::shape::{Shape, ShapeIdentifier, ShapeRegistry};
    pub use crate::submission::{
        DiscardSubmitter, HttpSubmitter, Submission, SubmissionError, Submitter, submitter_for,
    };
    pub use crate::tracer::{
        RecordedPath, RecordingMode, ShapeTracer, TracerConfig, TracerPhase, TracerSnapshot,
    };
    pub use crate::view::{Banner, TracerView};
}

pub use prelude::*;
