//! Read-only cluster snapshot model and the capacity accounting built on it.
//!
//! Everything here treats the orchestration platform's local cache as a
//! read-only data source: hosts and workload instances come in as
//! snapshots, get filtered for eligibility, and feed the spare-capacity
//! calculation that drives lease requests.
//!
//! # Components
//!
//! - [`ResourceVector`]: per-kind resource quantities with pointwise math
//! - [`eligibility`]: which hosts can take new work, which instances
//!   still count against capacity, and the renew/retire partition
//! - [`accounting`]: total capacity, total committed, spare capacity
//! - [`ClusterCache`]: the injected snapshot source

pub mod accounting;
pub mod cache;
pub mod eligibility;
pub mod host;
pub mod instance;
pub mod resources;

pub use cache::ClusterCache;
pub use host::{Host, Taint, TaintEffect};
pub use instance::{ContainerSpec, InstancePhase, WorkloadInstance};
pub use resources::ResourceVector;
