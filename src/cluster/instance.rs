use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cluster::ResourceVector;

/// Label marking a workload instance as owned by this agent.
pub const MANAGED_LABEL: &str = "batchlet.io/managed";
/// Label carrying the queue job id a managed instance was created for.
pub const JOB_ID_LABEL: &str = "batchlet.io/job-id";
/// Annotation set once an instance's terminal state has been recorded and
/// the instance may be deleted without losing information.
pub const READY_FOR_CLEANUP_ANNOTATION: &str = "batchlet.io/ready-for-cleanup";

/// Lifecycle phase of a workload instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstancePhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl InstancePhase {
    /// Succeeded and Failed are terminal: the instance makes no further
    /// progress and no longer consumes schedulable capacity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstancePhase::Succeeded | InstancePhase::Failed)
    }
}

impl std::fmt::Display for InstancePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstancePhase::Pending => write!(f, "pending"),
            InstancePhase::Running => write!(f, "running"),
            InstancePhase::Succeeded => write!(f, "succeeded"),
            InstancePhase::Failed => write!(f, "failed"),
            InstancePhase::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single container declared by a workload instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    /// Declared resource limits; capacity accounting uses limits, not
    /// requests
    pub resource_limits: ResourceVector,
}

/// Read-only snapshot of a workload instance from the platform cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadInstance {
    pub name: String,
    pub uid: Uuid,
    /// Host the instance is assigned to, once it has been scheduled
    pub host_name: Option<String>,
    pub phase: InstancePhase,
    pub containers: Vec<ContainerSpec>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    /// When the instance entered a terminal phase, if it has
    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkloadInstance {
    pub fn new(name: impl Into<String>, phase: InstancePhase) -> Self {
        Self {
            name: name.into(),
            uid: Uuid::new_v4(),
            host_name: None,
            phase,
            containers: Vec::new(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            finished_at: None,
        }
    }

    pub fn on_host(mut self, host: impl Into<String>) -> Self {
        self.host_name = Some(host.into());
        self
    }

    pub fn with_container(mut self, name: impl Into<String>, resource_limits: ResourceVector) -> Self {
        self.containers.push(ContainerSpec {
            name: name.into(),
            resource_limits,
        });
        self
    }

    /// Attach this agent's ownership label and the job id the instance
    /// was created for.
    pub fn managed_for_job(mut self, job_id: impl Into<String>) -> Self {
        self.labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
        self.labels.insert(JOB_ID_LABEL.to_string(), job_id.into());
        self
    }

    pub fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }

    pub fn marked_for_cleanup(mut self) -> Self {
        self.annotations
            .insert(READY_FOR_CLEANUP_ANNOTATION.to_string(), "true".to_string());
        self
    }

    pub fn is_managed(&self) -> bool {
        self.labels.contains_key(MANAGED_LABEL)
    }

    /// Queue job id this instance runs, when it carries the label.
    pub fn job_id(&self) -> Option<&str> {
        self.labels.get(JOB_ID_LABEL).map(String::as_str)
    }

    pub fn is_marked_ready_for_cleanup(&self) -> bool {
        self.annotations.contains_key(READY_FOR_CLEANUP_ANNOTATION)
    }
}
