/**
 * Thread-safe session state for one `Client`.
 *
 * Holds the `(session_id, initialized)` pair behind a `RwLock`:
 * - reads (`get`, `is_initialized`, auth resolution) share the lock,
 * - writes (`set`, `clear_if`) take it exclusively.
 *
 * The pair is always written whole inside a single critical section, so
 * no reader can observe `initialized == true` with an empty id or the
 * other way round. The lock never spans I/O.
 */
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A consistent copy of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub initialized: bool,
}

impl SessionSnapshot {
    /// The session id, if a session is active.
    pub fn active_id(&self) -> Option<&str> {
        if self.initialized && !self.session_id.is_empty() {
            Some(&self.session_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<SessionSnapshot>,
}

impl SessionState {
    /// Creates an empty, uninitialized state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> SessionSnapshot {
        self.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.read().initialized
    }

    pub fn session_id(&self) -> String {
        self.read().session_id.clone()
    }

    /**
     * Replaces the pair atomically.
     *
     * `initialized` is kept equal to `!session_id.is_empty()`: marking an
     * empty id as initialized clears the state instead, and an
     * uninitialized state never keeps an id.
     */
    pub fn set(&self, session_id: impl Into<String>, initialized: bool) {
        let session_id = session_id.into();
        let initialized = initialized && !session_id.is_empty();

        let mut inner = self.write();
        inner.session_id = if initialized { session_id } else { String::new() };
        inner.initialized = initialized;
    }

    /**
     * Clears the state only if the active session is still `session_id`.
     *
     * Returns `false` when another session replaced it in the meantime,
     * in which case that newer session is left alone.
     */
    pub fn clear_if(&self, session_id: &str) -> bool {
        let mut inner = self.write();
        if inner.session_id != session_id {
            return false;
        }
        *inner = SessionSnapshot::default();
        true
    }

    /*
     * Poisoning can only come from a panic outside the critical sections
     * above, which never leave the pair half-written.
     */
    fn read(&self) -> RwLockReadGuard<'_, SessionSnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_uninitialized() {
        let state = SessionState::new();
        assert_eq!(state.get(), SessionSnapshot::default());
        assert!(state.get().active_id().is_none());
    }

    #[test]
    fn test_set_keeps_invariant() {
        let state = SessionState::new();

        state.set("sess-1", true);
        assert_eq!(state.get().active_id(), Some("sess-1"));

        state.set("", true);
        assert!(!state.is_initialized());

        state.set("sess-2", false);
        assert_eq!(state.session_id(), "");
    }

    #[test]
    fn test_clear_if_only_clears_matching_session() {
        let state = SessionState::new();
        state.set("old", true);
        state.set("new", true);

        assert!(!state.clear_if("old"));
        assert_eq!(state.session_id(), "new");

        assert!(state.clear_if("new"));
        assert!(!state.is_initialized());
    }

    /**
     * Readers racing a writer that flips between two sessions and the
     * empty state must only ever see consistent pairs.
     */
    #[test]
    fn test_concurrent_readers_never_see_torn_pair() {
        let state = Arc::new(SessionState::new());

        let writer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for i in 0..5_000 {
                    match i % 3 {
                        0 => state.set(format!("session-{i}"), true),
                        1 => state.set("", false),
                        _ => {
                            let current = state.session_id();
                            state.clear_if(&current);
                        }
                    }
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        let snap = state.get();
                        assert_eq!(snap.initialized, !snap.session_id.is_empty());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
