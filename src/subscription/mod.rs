//! TTL-bounded job-set event subscriptions.
//!
//! One [`EventSubscriptionService`] instance drives one subscription's
//! poll loop against an [`EventSource`], mirroring its health into the
//! shared [`SubscriptionStateStore`] and stopping when the TTL elapses,
//! the source fails or ends, or the consumer unsubscribes.

pub mod events;
pub mod service;
pub mod store;

pub use events::{EventSource, JobSetEvent, JobSetEventKind, StreamEventSource};
pub use service::EventSubscriptionService;
pub use store::{InMemorySubscriptionStore, SubscriptionStateStore};
