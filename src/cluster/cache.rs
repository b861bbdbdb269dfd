use crate::cluster::host::Host;
use crate::cluster::instance::WorkloadInstance;
use crate::error::Result;

/// Read-only view of the platform's local cache of hosts and workload
/// instances.
///
/// Implementations serve from an informer-style local cache, so calls
/// are cheap enough to make every cycle. Failures are non-fatal to
/// callers: cycles log them and continue with an empty snapshot.
pub trait ClusterCache: Send + Sync {
    /// Snapshot of all hosts in the cluster.
    fn list_hosts(&self) -> Result<Vec<Host>>;

    /// Snapshot of all workload instances in the cluster.
    fn list_instances(&self) -> Result<Vec<WorkloadInstance>>;

    /// Snapshot of the instances owned by this agent.
    fn list_managed_instances(&self) -> Result<Vec<WorkloadInstance>> {
        Ok(self
            .list_instances()?
            .into_iter()
            .filter(|instance| instance.is_managed())
            .collect())
    }
}
