//! Admission gate that softly limits outbound API calls to one at a time.
//!
//! The gate tracks a busy flag and a count of callers currently polling to
//! get through. A contender re-checks the flag every poll interval until it
//! clears or the wait ceiling is hit, then proceeds regardless. This is a
//! soft throttle, not a mutex: once the ceiling is exhausted a caller moves
//! on even though another call may still be in flight. Starvation is
//! resolved by giving up the wait, not by queuing fairly.
//!
//! Each gate is an independent instance owned by its client, so tests can
//! run isolated gates side by side.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use jyotish_types::config::GateConfig;

pub struct CallGate {
    busy: AtomicBool,
    waiting: AtomicU32,
    poll_interval: Duration,
    max_waits: u32,
}

impl CallGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            busy: AtomicBool::new(false),
            waiting: AtomicU32::new(0),
            poll_interval: config.poll_interval(),
            max_waits: config.max_waits,
        }
    }

    /// Wait until the gate is free or the wait ceiling is reached.
    ///
    /// Never fails, only delays. The waiting count is shared across
    /// contenders and reset to zero on every exit, so under sustained
    /// contention the ceiling is reached quickly and callers start
    /// overlapping -- the intended trade against unbounded queuing lag.
    pub async fn acquire(&self, caller: &str) {
        while self.busy.load(Ordering::Acquire) && self.waiting.load(Ordering::Acquire) < self.max_waits {
            tracing::debug!(caller, "waiting in line for api call");
            tokio::time::sleep(self.poll_interval).await;
            self.waiting.fetch_add(1, Ordering::AcqRel);
        }
        self.waiting.store(0, Ordering::Release);
    }

    /// Flag a call as in flight.
    ///
    /// The returned guard clears the flag when dropped, so every exit path
    /// of the caller -- success, transport failure, decode failure --
    /// releases the gate.
    pub fn mark_busy(&self) -> InFlightGuard<'_> {
        self.busy.store(true, Ordering::Release);
        InFlightGuard { gate: self }
    }

    /// [`acquire`](Self::acquire) followed by [`mark_busy`](Self::mark_busy).
    pub async fn admit(&self, caller: &str) -> InFlightGuard<'_> {
        self.acquire(caller).await;
        self.mark_busy()
    }

    /// Whether a call is currently flagged as in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    #[cfg(test)]
    fn waiting_count(&self) -> u32 {
        self.waiting.load(Ordering::Acquire)
    }
}

/// RAII token for an in-flight call. Dropping it clears the busy flag.
pub struct InFlightGuard<'a> {
    gate: &'a CallGate,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
