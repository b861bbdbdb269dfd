use serde::{Deserialize, Serialize};

use crate::cluster::ResourceVector;

/// Lease request sent once per acquisition cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseRequest {
    pub cluster_id: String,
    /// Capacity the cluster can still take on, per resource kind
    pub spare_capacity: ResourceVector,
}

/// A job granted to this cluster by the queue service.
///
/// Ownership transfers to the submitter once the job is accepted; the
/// queue keeps the grant alive only as long as the agent renews it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeasedJob {
    pub id: String,
    pub queue: String,
    pub job_set_id: String,
    /// Opaque submission payload handed through to the platform
    pub payload: serde_json::Value,
}

impl LeasedJob {
    pub fn new(
        id: impl Into<String>,
        queue: impl Into<String>,
        job_set_id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            queue: queue.into(),
            job_set_id: job_set_id.into(),
            payload,
        }
    }
}
