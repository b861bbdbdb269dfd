//! Spare-capacity accounting over host and instance snapshots.

use crate::cluster::eligibility;
use crate::cluster::host::Host;
use crate::cluster::instance::WorkloadInstance;
use crate::cluster::ResourceVector;

/// Total allocatable resource across the given hosts.
pub fn total_capacity(hosts: &[&Host]) -> ResourceVector {
    let mut total = ResourceVector::new();
    for host in hosts {
        total.add(&host.allocatable);
    }
    total
}

/// Total resource committed by the given instances: the sum of declared
/// container limits over every container of every instance. Init
/// containers are not part of the snapshot model; only the main
/// container list is accounted.
pub fn total_committed(instances: &[&WorkloadInstance]) -> ResourceVector {
    let mut total = ResourceVector::new();
    for instance in instances {
        for container in &instance.containers {
            total.add(&container.resource_limits);
        }
    }
    total
}

/// Capacity still claimable for new work: the total allocatable resource
/// of eligible hosts minus what active instances on those hosts have
/// committed. Components go negative when the cluster is over-committed.
/// Inputs are never mutated.
pub fn spare_capacity(hosts: &[Host], instances: &[WorkloadInstance]) -> ResourceVector {
    let eligible = eligibility::eligible_hosts(hosts);
    let on_eligible = eligibility::instances_on_hosts(instances, &eligible);
    let active = eligibility::active_instances(&on_eligible);

    let mut spare = total_capacity(&eligible);
    spare.sub(&total_committed(&active));
    spare
}
