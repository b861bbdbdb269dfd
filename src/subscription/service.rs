use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::error::{BatchletError, Result};
use crate::subscription::events::{EventSource, JobSetEvent};
use crate::subscription::store::SubscriptionStateStore;

/// Drives one job-set subscription against an event source until a
/// terminal condition is reached.
///
/// Terminal outcomes:
/// - TTL expiry: `Err(BatchletError::SubscriptionExpired)`. A live,
///   chatty stream does not extend the deadline.
/// - Source error or end of stream: the error is recorded in the store
///   and returned. The subscribed flag stays set, since an upstream
///   failure is not consumer disinterest.
/// - Consumer unsubscribed: `Ok(())`, a deliberate, clean shutdown.
pub struct EventSubscriptionService<S> {
    queue: String,
    job_set_id: String,
    triggering_job_id: String,
    store: Arc<S>,
    forward: Option<mpsc::Sender<JobSetEvent>>,
}

impl<S: SubscriptionStateStore> EventSubscriptionService<S> {
    pub fn new(
        queue: impl Into<String>,
        job_set_id: impl Into<String>,
        triggering_job_id: impl Into<String>,
        store: Arc<S>,
    ) -> Self {
        Self {
            queue: queue.into(),
            job_set_id: job_set_id.into(),
            triggering_job_id: triggering_job_id.into(),
            store,
            forward: None,
        }
    }

    /// Deliver received events to `sender` as a side channel. Delivery
    /// problems do not affect the subscription outcome.
    pub fn with_forwarding(mut self, sender: mpsc::Sender<JobSetEvent>) -> Self {
        self.forward = Some(sender);
        self
    }

    /// Poll `source` until the TTL elapses, the source fails or ends, or
    /// the consumer unsubscribes.
    ///
    /// The deadline is computed once, up front, and never extended. Each
    /// fetch is bounded by the time remaining, so a fetch that outlives
    /// the deadline is cut off rather than overrunning it.
    pub async fn run<E: EventSource>(&self, mut source: E, ttl: Duration) -> Result<()> {
        self.store.subscribe(&self.queue, &self.job_set_id);
        let deadline = Instant::now() + ttl;
        tracing::info!(
            queue = %self.queue,
            job_set_id = %self.job_set_id,
            job_id = %self.triggering_job_id,
            ttl_secs = ttl.as_secs(),
            "Subscribed to job set events"
        );

        loop {
            let now = Instant::now();
            if now >= deadline {
                source.close().await;
                return Err(self.expired(ttl));
            }

            match tokio::time::timeout(deadline - now, source.next_event()).await {
                // Deadline elapsed mid-fetch. Same terminal condition as
                // the pre-fetch check, never reported as a source error.
                Err(_) => {
                    source.close().await;
                    return Err(self.expired(ttl));
                }
                Ok(Err(status)) => {
                    tracing::warn!(
                        queue = %self.queue,
                        job_set_id = %self.job_set_id,
                        error = %status,
                        "Event source failed"
                    );
                    self.store
                        .set_error(&self.queue, &self.job_set_id, &status.to_string());
                    source.close().await;
                    return Err(status.into());
                }
                Ok(Ok(None)) => {
                    let err = BatchletError::EventStreamEnded;
                    self.store
                        .set_error(&self.queue, &self.job_set_id, &err.to_string());
                    source.close().await;
                    return Err(err);
                }
                Ok(Ok(Some(event))) => {
                    // Successful contact: whatever error is on record is
                    // stale.
                    self.store.clear_error(&self.queue, &self.job_set_id);
                    if !self.store.is_subscribed(&self.queue, &self.job_set_id) {
                        tracing::info!(
                            queue = %self.queue,
                            job_set_id = %self.job_set_id,
                            "Consumer unsubscribed, closing event stream"
                        );
                        source.close().await;
                        return Ok(());
                    }
                    self.deliver(event);
                }
            }
        }
    }

    fn expired(&self, ttl: Duration) -> BatchletError {
        tracing::info!(
            queue = %self.queue,
            job_set_id = %self.job_set_id,
            "Subscription TTL elapsed, closing event stream"
        );
        BatchletError::SubscriptionExpired(ttl)
    }

    fn deliver(&self, event: JobSetEvent) {
        let Some(sender) = &self.forward else {
            return;
        };
        // A slow consumer must not stall the poll loop; on a full or
        // closed channel the event is dropped.
        if let Err(err) = sender.try_send(event) {
            tracing::debug!(
                queue = %self.queue,
                job_set_id = %self.job_set_id,
                error = %err,
                "Dropping job set event"
            );
        }
    }
}
