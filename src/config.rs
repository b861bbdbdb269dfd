use std::time::Duration;

/// Configuration for one cluster's agent.
///
/// One agent instance manages exactly one cluster. A process running
/// several clusters builds several configs and several service instances
/// with nothing shared between them.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Cluster identifier sent with every lease request
    pub cluster_id: String,
    /// Cadence of the acquire-and-submit cycle
    pub allocate_interval: Duration,
    /// Cadence of the renew-and-retire cycle
    pub manage_interval: Duration,
    /// Budget for each individual queue service call
    pub queue_call_timeout: Duration,
    /// How long a finished instance is left in place before retirement,
    /// unless it is explicitly marked ready for cleanup
    pub cleanup_grace: chrono::Duration,
    /// Deadline applied to every job-set event subscription
    pub subscription_ttl: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cluster_id: "default".to_string(),
            allocate_interval: Duration::from_secs(10),
            manage_interval: Duration::from_secs(10),
            queue_call_timeout: Duration::from_secs(1),
            cleanup_grace: chrono::Duration::minutes(1),
            subscription_ttl: Duration::from_secs(300),
        }
    }
}

impl AgentConfig {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            ..Default::default()
        }
    }

    pub fn with_allocate_interval(mut self, interval: Duration) -> Self {
        self.allocate_interval = interval;
        self
    }

    pub fn with_manage_interval(mut self, interval: Duration) -> Self {
        self.manage_interval = interval;
        self
    }

    pub fn with_queue_call_timeout(mut self, timeout: Duration) -> Self {
        self.queue_call_timeout = timeout;
        self
    }

    pub fn with_cleanup_grace(mut self, grace: chrono::Duration) -> Self {
        self.cleanup_grace = grace;
        self
    }

    pub fn with_subscription_ttl(mut self, ttl: Duration) -> Self {
        self.subscription_ttl = ttl;
        self
    }
}
