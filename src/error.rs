use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchletError {
    #[error("Cluster cache error: {0}")]
    Cache(String),

    #[error("Queue call timed out after {0:?}")]
    QueueTimeout(Duration),

    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),

    #[error("Failed to submit job {job_id}: {reason}")]
    Submit { job_id: String, reason: String },

    #[error("Subscription TTL of {0:?} expired")]
    SubscriptionExpired(Duration),

    #[error("Event stream ended")]
    EventStreamEnded,
}

pub type Result<T> = std::result::Result<T, BatchletError>;
