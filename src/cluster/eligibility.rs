//! Filters deciding which hosts can take new work and which workload
//! instances still count against capacity.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::cluster::host::{Host, TaintEffect};
use crate::cluster::instance::WorkloadInstance;

/// Hosts eligible to receive new work: schedulable and carrying no taint
/// that forbids placement without an explicit toleration.
pub fn eligible_hosts(hosts: &[Host]) -> Vec<&Host> {
    hosts.iter().filter(|host| is_eligible(host)).collect()
}

fn is_eligible(host: &Host) -> bool {
    if host.unschedulable {
        return false;
    }
    !host
        .taints
        .iter()
        .any(|taint| taint.effect == TaintEffect::NoSchedule)
}

/// Instances assigned to one of the given hosts, matched by host name.
pub fn instances_on_hosts<'a>(
    instances: &'a [WorkloadInstance],
    hosts: &[&Host],
) -> Vec<&'a WorkloadInstance> {
    let host_names: HashSet<&str> = hosts.iter().map(|host| host.name.as_str()).collect();
    instances
        .iter()
        .filter(|instance| {
            instance
                .host_name
                .as_deref()
                .map_or(false, |name| host_names.contains(name))
        })
        .collect()
}

/// Instances still consuming capacity: phase not terminal.
pub fn active_instances<'a>(instances: &[&'a WorkloadInstance]) -> Vec<&'a WorkloadInstance> {
    instances
        .iter()
        .copied()
        .filter(|instance| !instance.phase.is_terminal())
        .collect()
}

/// Instances that have reached a terminal phase.
pub fn terminal_instances<'a>(instances: &[&'a WorkloadInstance]) -> Vec<&'a WorkloadInstance> {
    instances
        .iter()
        .copied()
        .filter(|instance| instance.phase.is_terminal())
        .collect()
}

/// Instances carrying this agent's ownership label, on any host.
pub fn managed_instances(instances: &[WorkloadInstance]) -> Vec<&WorkloadInstance> {
    instances
        .iter()
        .filter(|instance| instance.is_managed())
        .collect()
}

/// Split managed instances into those whose leases must keep being
/// renewed and those that are finished and ready to retire. Every
/// instance lands in exactly one bucket.
pub fn partition_for_lease_management<'a>(
    instances: &[&'a WorkloadInstance],
    cleanup_grace: Duration,
    now: DateTime<Utc>,
) -> (Vec<&'a WorkloadInstance>, Vec<&'a WorkloadInstance>) {
    let mut renewable = Vec::new();
    let mut retirable = Vec::new();

    for instance in instances.iter().copied() {
        if is_ready_for_cleanup(instance, cleanup_grace, now) {
            retirable.push(instance);
        } else {
            renewable.push(instance);
        }
    }

    (renewable, retirable)
}

/// A finished instance is ready for cleanup once its terminal state has
/// either been explicitly marked as recorded or has aged past the grace
/// period.
pub fn is_ready_for_cleanup(
    instance: &WorkloadInstance,
    cleanup_grace: Duration,
    now: DateTime<Utc>,
) -> bool {
    if !instance.phase.is_terminal() {
        return false;
    }
    if instance.is_marked_ready_for_cleanup() {
        return true;
    }
    instance
        .finished_at
        .map_or(false, |finished| now - finished >= cleanup_grace)
}

/// Queue job ids carried by the given instances. Instances missing the
/// job id label are skipped.
pub fn job_ids(instances: &[&WorkloadInstance]) -> Vec<String> {
    instances
        .iter()
        .filter_map(|instance| instance.job_id().map(str::to_owned))
        .collect()
}
