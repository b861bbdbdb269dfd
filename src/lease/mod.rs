//! Lease-based job acquisition and lifecycle management.
//!
//! The queue service grants time-bounded leases on jobs; this module
//! computes how much new work the cluster can truthfully take on,
//! requests exactly that much, and keeps leases alive for work still
//! running while retiring work that finished.

pub mod client;
pub mod job;
pub mod service;

pub use client::{LeaseClient, QueueApi};
pub use job::{LeaseRequest, LeasedJob};
pub use service::{InstanceCleanup, JobLeaseService, JobSubmitter};
