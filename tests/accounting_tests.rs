use batchlet::cluster::instance::MANAGED_LABEL;
use batchlet::cluster::{
    accounting, eligibility, Host, InstancePhase, ResourceVector, TaintEffect, WorkloadInstance,
};
use chrono::{Duration, Utc};

fn host(name: &str, cpu: f64) -> Host {
    Host::new(name, ResourceVector::from([("cpu", cpu)]))
}

#[test]
fn test_eligible_hosts_excludes_cordoned_regardless_of_taints() {
    let hosts = vec![host("a", 4.0).cordoned(), host("b", 4.0)];

    let eligible = eligibility::eligible_hosts(&hosts);

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].name, "b");
}

#[test]
fn test_eligible_hosts_excludes_no_schedule_taint_regardless_of_flag() {
    let hosts = vec![
        host("a", 4.0).with_taint("dedicated", "infra", TaintEffect::NoSchedule),
        host("b", 4.0).with_taint("zone", "west", TaintEffect::PreferNoSchedule),
        host("c", 4.0).with_taint("maintenance", "", TaintEffect::NoExecute),
    ];

    let eligible = eligibility::eligible_hosts(&hosts);
    let names: Vec<&str> = eligible.iter().map(|h| h.name.as_str()).collect();

    // Only a hard placement ban keeps a host out of the pool
    assert_eq!(names, vec!["b", "c"]);
}

#[test]
fn test_instances_on_hosts_matches_by_host_name() {
    let hosts = vec![host("a", 4.0)];
    let eligible = eligibility::eligible_hosts(&hosts);
    let instances = vec![
        WorkloadInstance::new("on-a", InstancePhase::Running).on_host("a"),
        WorkloadInstance::new("elsewhere", InstancePhase::Running).on_host("z"),
        WorkloadInstance::new("unassigned", InstancePhase::Pending),
    ];

    let on_hosts = eligibility::instances_on_hosts(&instances, &eligible);

    assert_eq!(on_hosts.len(), 1);
    assert_eq!(on_hosts[0].name, "on-a");
}

#[test]
fn test_active_and_terminal_filters_cover_both_directions() {
    let instances = vec![
        WorkloadInstance::new("run", InstancePhase::Running),
        WorkloadInstance::new("pend", InstancePhase::Pending),
        WorkloadInstance::new("ok", InstancePhase::Succeeded),
        WorkloadInstance::new("bad", InstancePhase::Failed),
        WorkloadInstance::new("odd", InstancePhase::Unknown),
    ];
    let refs: Vec<&WorkloadInstance> = instances.iter().collect();

    let active: Vec<&str> = eligibility::active_instances(&refs)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(active, vec!["run", "pend", "odd"]);

    let terminal: Vec<&str> = eligibility::terminal_instances(&refs)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(terminal, vec!["ok", "bad"]);
}

#[test]
fn test_total_capacity_sums_allocatable() {
    let hosts = vec![host("a", 4.0), host("b", 4.0)];
    let refs: Vec<&Host> = hosts.iter().collect();

    let total = accounting::total_capacity(&refs);

    assert_eq!(total.get("cpu"), 8.0);
}

#[test]
fn test_total_committed_sums_limits_over_all_containers() {
    let instances = vec![
        WorkloadInstance::new("p1", InstancePhase::Running)
            .with_container("main", ResourceVector::from([("cpu", 1.0), ("memory", 2.0)]))
            .with_container("logger", ResourceVector::from([("cpu", 0.5)])),
        WorkloadInstance::new("p2", InstancePhase::Running)
            .with_container("main", ResourceVector::from([("cpu", 2.0)])),
    ];
    let refs: Vec<&WorkloadInstance> = instances.iter().collect();

    let committed = accounting::total_committed(&refs);

    assert_eq!(committed.get("cpu"), 3.5);
    assert_eq!(committed.get("memory"), 2.0);
}

#[test]
fn test_spare_capacity_two_hosts_one_active_instance() {
    let hosts = vec![host("a", 4.0), host("b", 4.0)];
    let instances = vec![WorkloadInstance::new("p1", InstancePhase::Running)
        .on_host("a")
        .with_container("main", ResourceVector::from([("cpu", 3.0)]))];

    let spare = accounting::spare_capacity(&hosts, &instances);

    assert_eq!(spare.get("cpu"), 5.0);
}

#[test]
fn test_spare_capacity_ignores_terminal_foreign_and_unassigned_instances() {
    let hosts = vec![host("a", 4.0), host("c", 4.0).cordoned()];
    let instances = vec![
        WorkloadInstance::new("done", InstancePhase::Succeeded)
            .on_host("a")
            .with_container("main", ResourceVector::from([("cpu", 3.0)])),
        WorkloadInstance::new("on-cordoned", InstancePhase::Running)
            .on_host("c")
            .with_container("main", ResourceVector::from([("cpu", 2.0)])),
        WorkloadInstance::new("unassigned", InstancePhase::Pending)
            .with_container("main", ResourceVector::from([("cpu", 1.0)])),
    ];

    let spare = accounting::spare_capacity(&hosts, &instances);

    // Only host a counts and nothing active is committed on it
    assert_eq!(spare.get("cpu"), 4.0);
}

#[test]
fn test_spare_capacity_can_go_negative() {
    let hosts = vec![host("a", 2.0)];
    let instances = vec![WorkloadInstance::new("p", InstancePhase::Running)
        .on_host("a")
        .with_container("main", ResourceVector::from([("cpu", 3.0)]))];

    let spare = accounting::spare_capacity(&hosts, &instances);

    assert_eq!(spare.get("cpu"), -1.0);
    assert!(!spare.has_spare());
}

#[test]
fn test_spare_capacity_does_not_mutate_inputs() {
    let hosts = vec![host("a", 4.0), host("b", 4.0)];
    let instances = vec![WorkloadInstance::new("p1", InstancePhase::Running)
        .on_host("a")
        .with_container("main", ResourceVector::from([("cpu", 3.0)]))];
    let allocatable_before: Vec<ResourceVector> =
        hosts.iter().map(|h| h.allocatable.clone()).collect();

    let first = accounting::spare_capacity(&hosts, &instances);
    let second = accounting::spare_capacity(&hosts, &instances);

    assert_eq!(first, second);
    for (host, before) in hosts.iter().zip(&allocatable_before) {
        assert_eq!(&host.allocatable, before);
    }
}

#[test]
fn test_spare_capacity_matches_composed_filters() {
    let hosts = vec![
        host("a", 4.0),
        host("b", 6.0).cordoned(),
        host("c", 2.0).with_taint("dedicated", "infra", TaintEffect::NoSchedule),
    ];
    let instances = vec![
        WorkloadInstance::new("p1", InstancePhase::Running)
            .on_host("a")
            .with_container("main", ResourceVector::from([("cpu", 1.5)])),
        WorkloadInstance::new("p2", InstancePhase::Failed)
            .on_host("a")
            .with_container("main", ResourceVector::from([("cpu", 1.0)])),
        WorkloadInstance::new("p3", InstancePhase::Running)
            .on_host("b")
            .with_container("main", ResourceVector::from([("cpu", 2.0)])),
    ];

    let spare = accounting::spare_capacity(&hosts, &instances);

    let eligible = eligibility::eligible_hosts(&hosts);
    let on_eligible = eligibility::instances_on_hosts(&instances, &eligible);
    let active = eligibility::active_instances(&on_eligible);
    let mut expected = accounting::total_capacity(&eligible);
    expected.sub(&accounting::total_committed(&active));

    assert_eq!(spare, expected);
    assert_eq!(spare.get("cpu"), 2.5);
}

#[test]
fn test_managed_instances_filters_by_ownership_label() {
    let instances = vec![
        WorkloadInstance::new("ours", InstancePhase::Running).managed_for_job("job-1"),
        WorkloadInstance::new("theirs", InstancePhase::Running),
    ];

    let managed = eligibility::managed_instances(&instances);

    assert_eq!(managed.len(), 1);
    assert_eq!(managed[0].name, "ours");
}

#[test]
fn test_partition_is_total_and_disjoint() {
    let now = Utc::now();
    let grace = Duration::seconds(60);
    let instances = vec![
        WorkloadInstance::new("running", InstancePhase::Running).managed_for_job("job-1"),
        WorkloadInstance::new("fresh-finish", InstancePhase::Succeeded)
            .managed_for_job("job-2")
            .with_finished_at(now - Duration::seconds(5)),
        WorkloadInstance::new("old-finish", InstancePhase::Failed)
            .managed_for_job("job-3")
            .with_finished_at(now - Duration::seconds(120)),
        WorkloadInstance::new("marked", InstancePhase::Succeeded)
            .managed_for_job("job-4")
            .marked_for_cleanup(),
    ];
    let refs: Vec<&WorkloadInstance> = instances.iter().collect();

    let (renewable, retirable) = eligibility::partition_for_lease_management(&refs, grace, now);

    assert_eq!(renewable.len() + retirable.len(), refs.len());
    let renew_names: Vec<&str> = renewable.iter().map(|i| i.name.as_str()).collect();
    let retire_names: Vec<&str> = retirable.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(renew_names, vec!["running", "fresh-finish"]);
    assert_eq!(retire_names, vec!["old-finish", "marked"]);
    for name in &renew_names {
        assert!(!retire_names.contains(name));
    }
}

#[test]
fn test_terminal_instance_without_marker_or_finish_time_keeps_its_lease() {
    let now = Utc::now();
    let instance = WorkloadInstance::new("done", InstancePhase::Succeeded).managed_for_job("job-1");
    let refs = vec![&instance];

    let (renewable, retirable) =
        eligibility::partition_for_lease_management(&refs, Duration::seconds(60), now);

    assert_eq!(renewable.len(), 1);
    assert!(retirable.is_empty());
    assert!(!eligibility::is_ready_for_cleanup(
        &instance,
        Duration::seconds(60),
        now
    ));
}

#[test]
fn test_job_ids_skips_unlabeled_instances() {
    let mut stray = WorkloadInstance::new("stray", InstancePhase::Running);
    stray
        .labels
        .insert(MANAGED_LABEL.to_string(), "true".to_string());
    let instances = vec![
        WorkloadInstance::new("labeled", InstancePhase::Running).managed_for_job("job-1"),
        stray,
    ];
    let refs: Vec<&WorkloadInstance> = instances.iter().collect();

    assert_eq!(eligibility::job_ids(&refs), vec!["job-1".to_string()]);
}
