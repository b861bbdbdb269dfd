use std::collections::HashMap;
use std::sync::RwLock;

/// Per-subscription bookkeeping shared between subscription drivers and
/// whatever consumer decides to unsubscribe.
///
/// Keys are (queue, job set id). Writes are last-writer-wins per key;
/// there is no cross-key interaction.
pub trait SubscriptionStateStore: Send + Sync {
    /// True while the consumer still wants updates for this job set.
    fn is_subscribed(&self, queue: &str, job_set_id: &str) -> bool;

    /// Mark the job set subscribed. Clears any stale error left by an
    /// earlier subscription.
    fn subscribe(&self, queue: &str, job_set_id: &str);

    /// The consumer no longer wants updates. The record is kept with the
    /// flag turned off.
    fn unsubscribe(&self, queue: &str, job_set_id: &str);

    /// Record the latest failure contacting the event source.
    fn set_error(&self, queue: &str, job_set_id: &str, message: &str);

    /// Clear a recorded failure after a successful contact.
    fn clear_error(&self, queue: &str, job_set_id: &str);

    /// Most recent failure for this job set, if any.
    fn last_error(&self, queue: &str, job_set_id: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
struct SubscriptionState {
    subscribed: bool,
    last_error: Option<String>,
}

/// In-process [`SubscriptionStateStore`] backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    state: RwLock<HashMap<(String, String), SubscriptionState>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(queue: &str, job_set_id: &str) -> (String, String) {
        (queue.to_owned(), job_set_id.to_owned())
    }
}

impl SubscriptionStateStore for InMemorySubscriptionStore {
    fn is_subscribed(&self, queue: &str, job_set_id: &str) -> bool {
        let state = self.state.read().expect("subscription store lock");
        state
            .get(&Self::key(queue, job_set_id))
            .map_or(false, |entry| entry.subscribed)
    }

    fn subscribe(&self, queue: &str, job_set_id: &str) {
        let mut state = self.state.write().expect("subscription store lock");
        let entry = state.entry(Self::key(queue, job_set_id)).or_default();
        entry.subscribed = true;
        entry.last_error = None;
    }

    fn unsubscribe(&self, queue: &str, job_set_id: &str) {
        let mut state = self.state.write().expect("subscription store lock");
        if let Some(entry) = state.get_mut(&Self::key(queue, job_set_id)) {
            entry.subscribed = false;
        }
    }

    fn set_error(&self, queue: &str, job_set_id: &str, message: &str) {
        let mut state = self.state.write().expect("subscription store lock");
        let entry = state.entry(Self::key(queue, job_set_id)).or_default();
        entry.last_error = Some(message.to_owned());
    }

    fn clear_error(&self, queue: &str, job_set_id: &str) {
        let mut state = self.state.write().expect("subscription store lock");
        if let Some(entry) = state.get_mut(&Self::key(queue, job_set_id)) {
            entry.last_error = None;
        }
    }

    fn last_error(&self, queue: &str, job_set_id: &str) -> Option<String> {
        let state = self.state.read().expect("subscription store lock");
        state
            .get(&Self::key(queue, job_set_id))
            .and_then(|entry| entry.last_error.clone())
    }
}
