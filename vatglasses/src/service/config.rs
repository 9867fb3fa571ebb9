//! Service configuration types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::worker::{WorkerKind, DEFAULT_WORKER_CHANNEL_CAPACITY};

/// Default poll interval while waiting for a running pass.
pub const DEFAULT_WAIT_POLL_MS: u64 = 25;

/// What a trigger does when a pass is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolicy {
    /// Wait for the running pass, then run another.
    #[default]
    Wait,
    /// Return the latest snapshot; the trigger is folded into a follow-up pass
    /// run by the busy caller.
    Skip,
}

impl FromStr for BusyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wait" => Ok(BusyPolicy::Wait),
            "skip" => Ok(BusyPolicy::Skip),
            other => Err(format!("expected wait or skip, got '{}'", other)),
        }
    }
}

impl fmt::Display for BusyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusyPolicy::Wait => "wait",
            BusyPolicy::Skip => "skip",
        })
    }
}

/// Configuration for the sector service.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vatglasses::service::{BusyPolicy, ServiceConfig};
///
/// let config = ServiceConfig::builder()
///     .busy_policy(BusyPolicy::Skip)
///     .wait_poll(Duration::from_millis(10))
///     .build();
///
/// assert_eq!(config.busy_policy(), BusyPolicy::Skip);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    busy_policy: BusyPolicy,
    wait_poll: Duration,
    worker: WorkerKind,
    worker_channel_capacity: usize,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    pub fn busy_policy(&self) -> BusyPolicy {
        self.busy_policy
    }

    /// Poll interval of the wait loop.
    pub fn wait_poll(&self) -> Duration {
        self.wait_poll
    }

    pub fn worker(&self) -> WorkerKind {
        self.worker
    }

    /// Request channel capacity of the daemon worker.
    pub fn worker_channel_capacity(&self) -> usize {
        self.worker_channel_capacity
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            busy_policy: BusyPolicy::default(),
            wait_poll: Duration::from_millis(DEFAULT_WAIT_POLL_MS),
            worker: WorkerKind::default(),
            worker_channel_capacity: DEFAULT_WORKER_CHANNEL_CAPACITY,
        }
    }
}

impl From<&crate::config::ServiceSettings> for ServiceConfig {
    fn from(settings: &crate::config::ServiceSettings) -> Self {
        Self {
            busy_policy: settings.busy_policy,
            wait_poll: Duration::from_millis(settings.wait_poll_ms),
            worker: settings.worker,
            worker_channel_capacity: settings.worker_channel_capacity,
        }
    }
}

/// Builder for [`ServiceConfig`]; unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    busy_policy: Option<BusyPolicy>,
    wait_poll: Option<Duration>,
    worker: Option<WorkerKind>,
    worker_channel_capacity: Option<usize>,
}

impl ServiceConfigBuilder {
    pub fn busy_policy(mut self, policy: BusyPolicy) -> Self {
        self.busy_policy = Some(policy);
        self
    }

    pub fn wait_poll(mut self, poll: Duration) -> Self {
        self.wait_poll = Some(poll);
        self
    }

    pub fn worker(mut self, kind: WorkerKind) -> Self {
        self.worker = Some(kind);
        self
    }

    pub fn worker_channel_capacity(mut self, capacity: usize) -> Self {
        self.worker_channel_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            busy_policy: self.busy_policy.unwrap_or(defaults.busy_policy),
            wait_poll: self.wait_poll.unwrap_or(defaults.wait_poll),
            worker: self.worker.unwrap_or(defaults.worker),
            worker_channel_capacity: self
                .worker_channel_capacity
                .unwrap_or(defaults.worker_channel_capacity),
        }
    }
}
