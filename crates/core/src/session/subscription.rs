use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::position::PositionSource;
use crate::session::SessionHandle;

/// A running request → process → request loop between a position source
/// and a session. Stopped explicitly or on drop.
pub struct PositionSubscription {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    joined: bool,
}

impl PositionSubscription {
    pub(crate) fn spawn<S: PositionSource>(mut source: S, session: SessionHandle) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let kind = source.kind();

        let task = tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!(?kind, "position subscription stopped");
                        break;
                    }
                    next = source.next_position() => next,
                };

                match next {
                    Ok(Some(position)) => {
                        if session.push_position(position).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::debug!(?kind, "position source exhausted");
                        break;
                    }
                    Err(error) => {
                        let _ = session.report_position_error(error);
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            task,
            joined: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the source to run dry or fail.
    pub async fn finished(&mut self) {
        if !self.joined {
            let _ = (&mut self.task).await;
            self.joined = true;
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for PositionSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}
