//! Sources of position samples.
//!
//! A source works in a request/callback cycle: the session asks for the
//! next sample, processes it, and asks again. An error ends the cycle for
//! good; sources are never retried.

use std::future::Future;
use std::pin::Pin;

use geo::Point;
use serde::Deserialize;

mod channel;
mod replay;

pub use channel::{ChannelPositionSource, PositionSender, position_channel};
pub use replay::ReplayPositionSource;

/// Where positions come from. Each session accepts exactly one kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSourceKind {
    /// The device's location sensor.
    #[default]
    Geolocation,
    /// Pointer movement over the map, for testing on a desk.
    Pointer,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Geolocation is not supported by this device")]
    Unsupported,

    #[error("Location permission was denied")]
    PermissionDenied,

    #[error("{0}")]
    Other(String),
}

/// `Ok(None)` means the source has nothing more to give.
pub type PositionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Point>, PositionError>> + Send + 'a>>;

pub trait PositionSource: Send + 'static {
    fn kind(&self) -> PositionSourceKind;

    /// Request the next sample.
    fn next_position(&mut self) -> PositionFuture<'_>;
}
