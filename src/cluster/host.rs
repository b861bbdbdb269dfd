use serde::{Deserialize, Serialize};

use crate::cluster::ResourceVector;

/// Effect of a scheduling restriction carried by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaintEffect {
    /// New workloads are not placed on the host without an explicit
    /// toleration
    NoSchedule,
    /// The scheduler avoids the host but may still use it
    PreferNoSchedule,
    /// Running workloads are evicted from the host
    NoExecute,
}

/// A scheduling restriction on a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    pub value: String,
    pub effect: TaintEffect,
}

/// Read-only snapshot of a worker host, as served by the platform cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    /// True when the host is cordoned and must not receive new work
    pub unschedulable: bool,
    pub taints: Vec<Taint>,
    /// Total resource the platform will allocate on this host
    pub allocatable: ResourceVector,
}

impl Host {
    pub fn new(name: impl Into<String>, allocatable: ResourceVector) -> Self {
        Self {
            name: name.into(),
            unschedulable: false,
            taints: Vec::new(),
            allocatable,
        }
    }

    pub fn cordoned(mut self) -> Self {
        self.unschedulable = true;
        self
    }

    pub fn with_taint(mut self, key: impl Into<String>, value: impl Into<String>, effect: TaintEffect) -> Self {
        self.taints.push(Taint {
            key: key.into(),
            value: value.into(),
            effect,
        });
        self
    }
}
