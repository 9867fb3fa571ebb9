//! Non-reentrant pass flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Serializes update passes.
///
/// Only one [`PassGuard`] exists at a time. Dropping the guard clears the flag,
/// including on error and panic paths.
#[derive(Debug, Default)]
pub struct UpdateGate {
    busy: AtomicBool,
}

impl UpdateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate if no pass is running.
    pub fn try_begin(&self) -> Option<PassGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard { gate: self })
    }

    /// Claim the gate, polling every `poll` until the running pass finishes.
    pub async fn begin(&self, poll: Duration) -> PassGuard<'_> {
        loop {
            if let Some(guard) = self.try_begin() {
                return guard;
            }
            self.wait_idle(poll).await;
        }
    }

    /// Wait until no pass is running.
    pub async fn wait_idle(&self, poll: Duration) {
        while self.is_busy() {
            tokio::time::sleep(poll).await;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one pass.
#[derive(Debug)]
pub struct PassGuard<'a> {
    gate: &'a UpdateGate,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
