use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tonic::Status;

use crate::cluster::ResourceVector;
use crate::error::{BatchletError, Result};
use crate::lease::job::{LeaseRequest, LeasedJob};

/// Remote queue service operations used by the agent.
///
/// The concrete implementation wraps the queue's gRPC API; the wire
/// layer is not this crate's concern, so the trait speaks domain types
/// and `tonic::Status` errors.
#[async_trait]
pub trait QueueApi: Send + Sync {
    async fn lease_jobs(&self, request: LeaseRequest) -> std::result::Result<Vec<LeasedJob>, Status>;

    async fn renew_lease(&self, job_ids: &[String]) -> std::result::Result<(), Status>;

    async fn report_done(&self, job_ids: &[String]) -> std::result::Result<(), Status>;
}

/// Time-bounded adapter over [`QueueApi`].
///
/// Every call gets its own deadline measured from call start; the
/// in-flight call is dropped when the budget elapses, so a slow queue
/// never holds a cycle for longer than the configured timeout.
pub struct LeaseClient<Q> {
    api: Arc<Q>,
    call_timeout: Duration,
}

impl<Q: QueueApi> LeaseClient<Q> {
    pub fn new(api: Arc<Q>, call_timeout: Duration) -> Self {
        Self { api, call_timeout }
    }

    /// Request new work up to `spare_capacity`.
    ///
    /// An `Err` means the call failed. Only `Ok` with an empty list means
    /// the queue genuinely had no work for this cluster.
    pub async fn request_lease(
        &self,
        cluster_id: &str,
        spare_capacity: ResourceVector,
    ) -> Result<Vec<LeasedJob>> {
        let request = LeaseRequest {
            cluster_id: cluster_id.to_owned(),
            spare_capacity,
        };
        self.bounded(self.api.lease_jobs(request)).await
    }

    /// Renew the lease on still-running jobs. Not sent at all when
    /// `job_ids` is empty.
    pub async fn renew_lease(&self, job_ids: &[String]) -> Result<()> {
        if job_ids.is_empty() {
            return Ok(());
        }
        self.bounded(self.api.renew_lease(job_ids)).await
    }

    /// Report finished jobs back to the queue. Not sent at all when
    /// `job_ids` is empty.
    pub async fn report_done(&self, job_ids: &[String]) -> Result<()> {
        if job_ids.is_empty() {
            return Ok(());
        }
        self.bounded(self.api.report_done(job_ids)).await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = std::result::Result<T, Status>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result.map_err(BatchletError::from),
            Err(_) => Err(BatchletError::QueueTimeout(self.call_timeout)),
        }
    }
}
