use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::cluster::{accounting, eligibility, ClusterCache, WorkloadInstance};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::lease::client::{LeaseClient, QueueApi};
use crate::lease::job::LeasedJob;

/// Hands an accepted job to the platform. Opaque to the lease service;
/// one failed submission never affects the others.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, job: &LeasedJob) -> Result<()>;
}

/// Deletes retired workload instances. Best effort: the lease service
/// fires and forgets.
#[async_trait]
pub trait InstanceCleanup: Send + Sync {
    async fn delete_instances(&self, instances: &[&WorkloadInstance]);
}

/// Orchestrates one cluster's lease lifecycle against the queue service.
///
/// Two independent cycles, each a pure function of the current snapshot
/// plus its injected collaborators:
/// - [`fill_spare_capacity`](Self::fill_spare_capacity) leases new work
///   up to spare capacity and hands it to the submitter.
/// - [`manage_leases`](Self::manage_leases) renews leases on running
///   work and retires finished work.
///
/// Remote failures are reported and absorbed; the next tick starts
/// fresh. Nothing here retries within a cycle.
pub struct JobLeaseService<C, Q, S, D> {
    config: AgentConfig,
    cache: Arc<C>,
    queue: LeaseClient<Q>,
    submitter: Arc<S>,
    cleanup: Arc<D>,
}

impl<C, Q, S, D> JobLeaseService<C, Q, S, D>
where
    C: ClusterCache,
    Q: QueueApi,
    S: JobSubmitter,
    D: InstanceCleanup,
{
    pub fn new(
        config: AgentConfig,
        cache: Arc<C>,
        queue_api: Arc<Q>,
        submitter: Arc<S>,
        cleanup: Arc<D>,
    ) -> Self {
        let queue = LeaseClient::new(queue_api, config.queue_call_timeout);
        Self {
            config,
            cache,
            queue,
            submitter,
            cleanup,
        }
    }

    /// Acquisition cycle: compute truthful spare capacity, lease that
    /// much new work, and hand each returned job to the submitter.
    pub async fn fill_spare_capacity(&self) {
        let hosts = self.cache.list_hosts().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to list hosts, using empty snapshot");
            Vec::new()
        });
        let instances = self.cache.list_instances().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to list workload instances, using empty snapshot");
            Vec::new()
        });

        let spare = accounting::spare_capacity(&hosts, &instances);
        tracing::debug!(
            cluster_id = %self.config.cluster_id,
            spare = %spare,
            "Requesting job leases"
        );

        let jobs = match self
            .queue
            .request_lease(&self.config.cluster_id, spare)
            .await
        {
            Ok(jobs) => jobs,
            Err(err) => {
                // No in-cycle retry; the next scheduled tick tries again.
                tracing::error!(error = %err, "Failed to lease new jobs");
                return;
            }
        };

        for job in &jobs {
            match self.submitter.submit(job).await {
                Ok(()) => {
                    tracing::info!(job_id = %job.id, queue = %job.queue, "Submitted leased job");
                }
                Err(err) => {
                    tracing::error!(job_id = %job.id, error = %err, "Failed to submit leased job");
                }
            }
        }
    }

    /// Maintenance cycle: renew leases for in-flight instances and
    /// retire finished ones.
    pub async fn manage_leases(&self) {
        let managed = self.cache.list_managed_instances().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to list managed instances, using empty snapshot");
            Vec::new()
        });

        let managed_refs: Vec<&WorkloadInstance> = managed.iter().collect();
        let (renewable, retirable) = eligibility::partition_for_lease_management(
            &managed_refs,
            self.config.cleanup_grace,
            Utc::now(),
        );

        self.renew(&renewable).await;
        self.retire(&retirable).await;
    }

    async fn renew(&self, instances: &[&WorkloadInstance]) {
        if instances.is_empty() {
            return;
        }
        let job_ids = eligibility::job_ids(instances);
        tracing::debug!(jobs = %job_ids.join(","), "Renewing job leases");
        if let Err(err) = self.queue.renew_lease(&job_ids).await {
            // Renewal failure does not block retirement on this tick.
            tracing::error!(error = %err, "Failed to renew job leases");
        }
    }

    async fn retire(&self, instances: &[&WorkloadInstance]) {
        if instances.is_empty() {
            return;
        }
        let job_ids = eligibility::job_ids(instances);
        if let Err(err) = self.queue.report_done(&job_ids).await {
            tracing::error!(error = %err, "Failed to report finished jobs");
        }
        // Deletion runs regardless of the report outcome: reclamation
        // wins over upstream consistency for instances that are already
        // finished.
        self.cleanup.delete_instances(instances).await;
        tracing::info!(count = instances.len(), "Retired finished instances");
    }

    /// Drive both cycles on their configured cadences until `shutdown`
    /// fires. Each tick stands alone; failures are logged and absorbed.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut allocate = tokio::time::interval(self.config.allocate_interval);
        let mut manage = tokio::time::interval(self.config.manage_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(cluster_id = %self.config.cluster_id, "Lease service shutting down");
                    return;
                }
                _ = allocate.tick() => self.fill_spare_capacity().await,
                _ = manage.tick() => self.manage_leases().await,
            }
        }
    }
}
