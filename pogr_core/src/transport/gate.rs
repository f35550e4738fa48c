/**
 * Per-host connection ceiling.
 *
 * `ureq` bounds how many *idle* connections it keeps, but not how many
 * requests may be in flight to the same host. `HostGate` adds that
 * ceiling: each in-flight request holds a `Permit` for its host, and
 * callers over the limit wait until a permit is released or their
 * deadline passes.
 *
 * Uses a `Mutex<HashMap<host, count>>` + `Condvar` pair:
 * - `acquire` increments the host's count, waiting while it is at the limit.
 * - Dropping the `Permit` decrements it and wakes the waiters.
 */
use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::TransportError;

pub struct HostGate {
    /// Maximum concurrent requests per host. `0` means unlimited.
    limit: usize,

    active: Mutex<HashMap<String, usize>>,
    condvar: Condvar,
}

impl HostGate {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            active: Mutex::new(HashMap::new()),
            condvar: Condvar::new(),
        }
    }

    /**
     * Reserves a slot for `host`, blocking while the host is saturated.
     *
     * # Returns
     * * `Ok(Permit)`: release the slot by dropping it.
     * * `Err(TransportError::Timeout)`: `deadline` passed while waiting.
     */
    pub fn acquire(
        &self,
        host: &str,
        deadline: Option<Instant>,
    ) -> Result<Permit<'_>, TransportError> {
        let mut active = self.lock();

        loop {
            let count = active.get(host).copied().unwrap_or(0);
            if self.limit == 0 || count < self.limit {
                *active.entry(host.to_string()).or_insert(0) += 1;
                return Ok(Permit {
                    gate: self,
                    host: host.to_string(),
                });
            }

            active = match deadline {
                None => self
                    .condvar
                    .wait(active)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Err(TransportError::Timeout);
                    }
                    self.condvar
                        .wait_timeout(active, left)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }

    /// Number of requests currently holding a permit for `host`.
    pub fn in_flight(&self, host: &str) -> usize {
        self.lock().get(host).copied().unwrap_or(0)
    }

    fn release(&self, host: &str) {
        let mut active = self.lock();
        if let Some(count) = active.get_mut(host) {
            *count -= 1;
            if *count == 0 {
                active.remove(host);
            }
        }
        self.condvar.notify_all();
    }

    /*
     * The map is only ever mutated by whole-entry updates, so a poisoned
     * lock still guards a consistent map.
     */
    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A reserved connection slot; released on drop.
pub struct Permit<'a> {
    gate: &'a HostGate,
    host: String,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release(&self.host);
    }
}
