use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt};
use tonic::Status;

/// Status transition reported for a single job within a job set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobSetEventKind {
    Queued,
    Leased { cluster_id: String },
    Pending,
    Running,
    Succeeded,
    Failed { reason: String },
    Cancelled,
}

/// One job status event from the queue's job-set stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSetEvent {
    pub job_id: String,
    pub queue: String,
    pub job_set_id: String,
    pub kind: JobSetEventKind,
    pub timestamp: DateTime<Utc>,
}

impl JobSetEvent {
    pub fn new(
        job_id: impl Into<String>,
        queue: impl Into<String>,
        job_set_id: impl Into<String>,
        kind: JobSetEventKind,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            queue: queue.into(),
            job_set_id: job_set_id.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Source of job-set events, typically a server-streaming RPC.
///
/// `Ok(None)` signals the end of the stream. Either an error or the end
/// of the stream is terminal for the subscription driving the source.
#[async_trait]
pub trait EventSource: Send {
    /// Next event from the stream. May block until one arrives.
    async fn next_event(&mut self) -> std::result::Result<Option<JobSetEvent>, Status>;

    /// Release the underlying stream.
    async fn close(&mut self);
}

/// [`EventSource`] over any stream of event results, the shape a gRPC
/// server-streaming response body has.
pub struct StreamEventSource<S> {
    inner: S,
}

impl<S> StreamEventSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S> EventSource for StreamEventSource<S>
where
    S: Stream<Item = std::result::Result<JobSetEvent, Status>> + Send + Unpin,
{
    async fn next_event(&mut self) -> std::result::Result<Option<JobSetEvent>, Status> {
        self.inner.next().await.transpose()
    }

    async fn close(&mut self) {}
}
