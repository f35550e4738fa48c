/**
 * Deadline enforcement around an arbitrary `Transport`.
 *
 * A blocking `send` cannot be interrupted from the outside, so for
 * transports that do not honour `Request::deadline` themselves the call
 * runs on a short-lived dispatch thread while the caller waits on a
 * one-slot channel with `recv_timeout`:
 *
 * ```text
 *  caller ──spawn──► pogr-dispatch ── transport.send() ──┐
 *    │                                                    │
 *    └──── recv_timeout(remaining) ◄──── Result ──────────┘
 * ```
 *
 * If the deadline passes first the caller gets `TransportError::Timeout`
 * and the dispatch thread's eventual result is discarded. A thread stuck
 * in the transport keeps its slot until `send` returns, and once
 * `MAX_OUTSTANDING_DISPATCHES` slots are held further calls fail with
 * `TransportError::Saturated` instead of spawning.
 */
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::RecvTimeoutError;

use super::{Request, Response, Transport};
use crate::error::TransportError;

/// Dispatch threads allowed to be alive at once, abandoned ones included.
pub const MAX_OUTSTANDING_DISPATCHES: usize = 64;

static OUTSTANDING: AtomicUsize = AtomicUsize::new(0);

/**
 * Sends `request` through `transport`, returning no later than the
 * request's deadline.
 *
 * Requests without a deadline, and transports that enforce deadlines
 * themselves, are sent inline on the calling thread.
 */
pub fn send(
    transport: &Arc<dyn Transport>,
    request: Request,
) -> Result<Response, TransportError> {
    send_with_limit(transport, request, &OUTSTANDING, MAX_OUTSTANDING_DISPATCHES)
}

/// One claimed dispatch slot, given back when the thread finishes.
struct Slot(&'static AtomicUsize);

impl Slot {
    fn claim(counter: &'static AtomicUsize, limit: usize) -> Result<Self, TransportError> {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .map(|_| Slot(counter))
            .map_err(|outstanding| {
                tracing::warn!(outstanding, "too many dispatch threads stuck in the transport");
                TransportError::Saturated { outstanding }
            })
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

fn send_with_limit(
    transport: &Arc<dyn Transport>,
    request: Request,
    outstanding: &'static AtomicUsize,
    limit: usize,
) -> Result<Response, TransportError> {
    let remaining = match request.remaining() {
        Some(remaining) if !transport.enforces_deadline() => remaining,
        _ => return transport.send(request),
    };

    if remaining.is_zero() {
        return Err(TransportError::Timeout);
    }

    let slot = Slot::claim(outstanding, limit)?;
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let transport = Arc::clone(transport);

    thread::Builder::new()
        .name("pogr-dispatch".into())
        .spawn(move || {
            let _slot = slot;
            /* The receiver is gone if the caller already timed out. */
            let _ = sender.send(transport.send(request));
        })
        .map_err(|e| TransportError::Request(format!("failed to spawn dispatch thread: {e}")))?;

    match receiver.recv_timeout(remaining) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(
                outstanding = outstanding.load(Ordering::Acquire),
                "transport missed the deadline; abandoning its dispatch thread"
            );
            Err(TransportError::Timeout)
        }
        Err(RecvTimeoutError::Disconnected) => Err(TransportError::Request(
            "dispatch thread exited without a response".into(),
        )),
    }
}
