use geo::Point;
use tokio::sync::mpsc;

use crate::position::{PositionError, PositionFuture, PositionSource, PositionSourceKind};

type Message = Result<Point, PositionError>;

/// Create a source fed from host callbacks, e.g. a native location
/// listener or a pointer-move handler.
pub fn position_channel(kind: PositionSourceKind) -> (PositionSender, ChannelPositionSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PositionSender { tx }, ChannelPositionSource { kind, rx })
}

#[derive(Clone, Debug)]
pub struct PositionSender {
    tx: mpsc::UnboundedSender<Message>,
}

impl PositionSender {
    /// Returns `false` once nobody is listening anymore.
    pub fn send(&self, position: Point) -> bool {
        self.tx.send(Ok(position)).is_ok()
    }

    /// Report that positions can no longer be acquired.
    pub fn fail(&self, error: PositionError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}

pub struct ChannelPositionSource {
    kind: PositionSourceKind,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl PositionSource for ChannelPositionSource {
    fn kind(&self) -> PositionSourceKind {
        self.kind
    }

    fn next_position(&mut self) -> PositionFuture<'_> {
        Box::pin(async move {
            match self.rx.recv().await {
                Some(Ok(position)) => Ok(Some(position)),
                Some(Err(error)) => Err(error),
                None => Ok(None),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (sender, mut source) = position_channel(PositionSourceKind::Pointer);
        assert_eq!(source.kind(), PositionSourceKind::Pointer);

        assert!(sender.send(Point::new(1.0, 2.0)));
        assert!(sender.fail(PositionError::PermissionDenied));

        assert_eq!(source.next_position().await, Ok(Some(Point::new(1.0, 2.0))));
        assert_eq!(source.next_position().await, Err(PositionError::PermissionDenied));

        drop(sender);
        assert_eq!(source.next_position().await, Ok(None));
    }

    #[test]
    fn test_send_after_source_dropped() {
        let (sender, source) = position_channel(PositionSourceKind::Geolocation);
        drop(source);
        assert!(!sender.send(Point::new(0.0, 0.0)));
    }
}
