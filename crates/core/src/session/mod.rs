//! One player's attempt at a shape.
//!
//! A session owns its [`ShapeTracer`] inside a single task. Position
//! samples, start and finish requests all travel through one command
//! channel, so every update is applied atomically and in arrival order.
//! Renderers observe the result through [`SessionSnapshot`]s published on
//! a watch channel.

use std::sync::Arc;

use geo::Point;
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot, watch};

use crate::error::{ConfigurationError, Result, TracerError};
use crate::position::{PositionError, PositionSource, PositionSourceKind};
use crate::shape::{Shape, ShapeIdentifier, ShapeRegistry};
use crate::submission::{Submission, Submitter};
use crate::tracer::{ShapeTracer, TracerConfig, TracerSnapshot};
use crate::view::TracerView;

mod subscription;

pub use subscription::PositionSubscription;

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    pub shape: ShapeIdentifier,
    #[serde(default)]
    pub tracer: TracerConfig,
    #[serde(default)]
    pub position_source: PositionSourceKind,
    #[serde(default)]
    pub nickname: String,
    /// Results service URL. Finished paths are only logged without one.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl SessionConfig {
    pub fn new(shape: impl Into<ShapeIdentifier>) -> Self {
        Self {
            shape: shape.into(),
            tracer: TracerConfig::default(),
            position_source: PositionSourceKind::default(),
            nickname: String::new(),
            endpoint: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub tracer: TracerSnapshot,
    /// Set once the position source has failed; no more samples will arrive.
    pub position_error: Option<PositionError>,
}

enum Command {
    Position(Point),
    PositionFailed(PositionError),
    Start(oneshot::Sender<bool>),
    Finish(oneshot::Sender<bool>),
    Flush(oneshot::Sender<bool>),
}

pub struct Session {
    tracer: ShapeTracer,
    nickname: String,
    submitter: Arc<dyn Submitter>,
    position_error: Option<PositionError>,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Session {
    /// Resolve the configured shape and start the session task on the
    /// current tokio runtime.
    pub fn spawn(
        config: SessionConfig,
        registry: &ShapeRegistry,
        submitter: Arc<dyn Submitter>,
    ) -> Result<SessionHandle> {
        let shape = registry.resolve(&config.shape)?;
        let tracer = ShapeTracer::new(Arc::clone(&shape), config.tracer)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot {
            tracer: tracer.snapshot(),
            position_error: None,
        });

        let session = Session {
            tracer,
            nickname: config.nickname,
            submitter,
            position_error: None,
            commands: command_rx,
            snapshots: snapshot_tx,
        };

        tracing::info!(shape = %config.shape, source = ?config.position_source, "session started");
        tokio::spawn(session.run());

        Ok(SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            shape,
            source: config.position_source,
            future_points: config.tracer.future_points,
        })
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            let reply = self.handle(command);
            self.publish();

            // reply after publishing so callers see the new snapshot
            if let Some((reply, value)) = reply {
                let _ = reply.send(value);
            }
        }

        tracing::debug!(shape = %self.tracer.shape().name(), "session closed");
    }

    fn handle(&mut self, command: Command) -> Option<(oneshot::Sender<bool>, bool)> {
        match command {
            Command::Position(position) => {
                if self.position_error.is_none() {
                    self.tracer.on_position(position);
                }
                None
            }
            Command::PositionFailed(error) => {
                tracing::warn!(%error, "position source failed");
                self.position_error = Some(error);
                None
            }
            Command::Start(reply) => Some((reply, self.tracer.start())),
            Command::Finish(reply) => {
                let finished = match self.tracer.finish() {
                    Some(submission) => {
                        self.submit(submission);
                        true
                    }
                    None => false,
                };
                Some((reply, finished))
            }
            Command::Flush(reply) => Some((reply, true)),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(SessionSnapshot {
            tracer: self.tracer.snapshot(),
            position_error: self.position_error.clone(),
        });
    }

    /// Send the path off without waiting for it.
    fn submit(&self, submission: Submission) {
        let request = submission.to_request(&self.nickname);
        let submitter = Arc::clone(&self.submitter);

        tokio::spawn(async move {
            match submitter.submit(&request).await {
                Ok(()) => tracing::info!(points = request.points.len(), "submitted traced path"),
                Err(error) => tracing::warn!(%error, "failed to submit traced path"),
            }
        });
    }
}

/// Handle to a running session. Cheap to clone; the session ends when the
/// last handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    shape: Arc<Shape>,
    source: PositionSourceKind,
    future_points: usize,
}

impl SessionHandle {
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    pub fn position_source(&self) -> PositionSourceKind {
        self.source
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| TracerError::SessionClosed)
    }

    async fn request(&self, command: impl FnOnce(oneshot::Sender<bool>) -> Command) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(command(tx))?;
        rx.await.map_err(|_| TracerError::SessionClosed)
    }

    /// Queue a position sample, in playfield meters.
    pub fn push_position(&self, position: Point) -> Result<()> {
        self.send(Command::Position(position))
    }

    /// Put the session into its degraded state: no further samples are
    /// processed.
    pub fn report_position_error(&self, error: PositionError) -> Result<()> {
        self.send(Command::PositionFailed(error))
    }

    /// Whether recording started. See [`ShapeTracer::start`].
    pub async fn start(&self) -> Result<bool> {
        self.request(Command::Start).await
    }

    /// Whether the session completed. The path is submitted in the
    /// background; submission failures are only logged.
    pub async fn finish(&self) -> Result<bool> {
        self.request(Command::Finish).await
    }

    /// Wait until every command queued so far has been applied.
    pub async fn flush(&self) -> Result<()> {
        self.request(Command::Flush).await.map(|_| ())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Render model for the latest snapshot.
    pub fn view(&self) -> TracerView {
        TracerView::build(&self.shape, &self.snapshot(), self.future_points)
    }

    /// Feed the session from `source` until it is exhausted, fails, or the
    /// returned subscription is stopped or dropped.
    pub fn attach<S: PositionSource>(&self, source: S) -> Result<PositionSubscription> {
        if source.kind() != self.source {
            return Err(ConfigurationError::SourceDisabled(source.kind()).into());
        }
        Ok(PositionSubscription::spawn(source, self.clone()))
    }
}
