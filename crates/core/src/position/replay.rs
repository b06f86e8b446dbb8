use std::time::Duration;

use geo::Point;

use crate::position::{PositionError, PositionFuture, PositionSource, PositionSourceKind};

/// Plays back a fixed list of samples, optionally paced and optionally
/// ending in an acquisition error.
pub struct ReplayPositionSource {
    kind: PositionSourceKind,
    samples: std::vec::IntoIter<Point>,
    interval: Option<Duration>,
    failure: Option<PositionError>,
}

impl ReplayPositionSource {
    pub fn new(kind: PositionSourceKind, samples: Vec<Point>) -> Self {
        Self {
            kind,
            samples: samples.into_iter(),
            interval: None,
            failure: None,
        }
    }

    /// Wait this long before every sample.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Fail with `error` once the samples run out.
    pub fn then_fail(mut self, error: PositionError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl PositionSource for ReplayPositionSource {
    fn kind(&self) -> PositionSourceKind {
        self.kind
    }

    fn next_position(&mut self) -> PositionFuture<'_> {
        Box::pin(async move {
            if let Some(interval) = self.interval {
                tokio::time::sleep(interval).await;
            }

            match self.samples.next() {
                Some(position) => Ok(Some(position)),
                None => match self.failure.take() {
                    Some(error) => Err(error),
                    None => Ok(None),
                },
            }
        })
    }
}
