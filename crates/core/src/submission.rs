//! Best-effort upload of finished paths.
//!
//! Submissions are fire-and-forget: the session never waits for them and
//! nothing is retried.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use api_types::SubmissionRequest;
use geo::Point;

use crate::shape::Shape;

/// A finished trace, in playfield meters.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub shape: Arc<Shape>,
    pub points: Vec<Point>,
}

impl Submission {
    /// Convert to the wire format, unprojecting through the shape's frame.
    pub fn to_request(&self, nickname: &str) -> SubmissionRequest {
        let frame = self.shape.frame();
        SubmissionRequest {
            points: self.points.iter().map(|&p| frame.to_lat_lng(p)).collect(),
            shape: self.shape.to_lat_lng(),
            nickname: nickname.to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(u16),
}

pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmissionError>> + Send + 'a>>;

/// Where finished paths are sent.
pub trait Submitter: Send + Sync {
    fn submit<'a>(&'a self, request: &'a SubmissionRequest) -> SubmitFuture<'a>;
}

/// POSTs submissions as JSON.
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Submitter for HttpSubmitter {
    fn submit<'a>(&'a self, request: &'a SubmissionRequest) -> SubmitFuture<'a> {
        Box::pin(async move {
            let response = self.client.post(&self.endpoint).json(request).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SubmissionError::Status(status.as_u16()));
            }
            Ok(())
        })
    }
}

/// Used when no endpoint is configured; the path is only logged.
pub struct DiscardSubmitter;

impl Submitter for DiscardSubmitter {
    fn submit<'a>(&'a self, request: &'a SubmissionRequest) -> SubmitFuture<'a> {
        Box::pin(async move {
            tracing::info!(
                points = request.points.len(),
                nickname = %request.nickname,
                "no submission endpoint configured, discarding path"
            );
            Ok(())
        })
    }
}

/// Pick the submitter for an optional endpoint URL.
pub fn submitter_for(endpoint: Option<&str>) -> Arc<dyn Submitter> {
    match endpoint {
        Some(endpoint) => Arc::new(HttpSubmitter::new(endpoint)),
        None => Arc::new(DiscardSubmitter),
    }
}
