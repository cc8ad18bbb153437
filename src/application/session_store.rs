//! Session store - single owner of the session snapshot.
//!
//! The store holds the snapshot behind a mutex and serializes operations
//! with an atomic busy flag. While one flow or review operation is
//! outstanding, every other mutating intent fails fast with a busy error;
//! this is what collapses double-submission into exactly one accepted
//! mutation. The lock is only held across synchronous sections, never
//! across a service call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::survey::SurveySession;

/// Mutex-guarded session snapshot plus the re-entrancy gate.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<Option<SurveySession>>,
    busy: AtomicBool,
}

impl SessionStore {
    /// Creates an empty store with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the busy gate for one operation.
    ///
    /// Returns `None` if another operation is already outstanding. The
    /// returned guard releases the gate on drop, success or failure alike.
    pub fn begin_operation(&self) -> Option<OperationGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(OperationGuard { store: self })
        } else {
            None
        }
    }

    /// Returns true while an operation is outstanding; hosts disable the
    /// submit/skip/edit/generate affordances on this.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// A clone of the current snapshot, if a session is active.
    pub fn snapshot(&self) -> Option<SurveySession> {
        self.state.lock().unwrap().clone()
    }

    /// Reads the state under the lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(Option<&SurveySession>) -> R) -> R {
        f(self.state.lock().unwrap().as_ref())
    }

    /// Mutates the state under the lock.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Option<SurveySession>) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

/// Releases the busy gate on drop.
#[derive(Debug)]
pub struct OperationGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.store.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::survey::SurveyQuestion;

    fn session() -> SurveySession {
        let question = SurveyQuestion::new(
            "Q1",
            vec!["A".to_string(), "B".to_string()],
            false,
            None,
        )
        .unwrap();
        SurveySession::started(SessionId::new(), question, 1, 3, 0).unwrap()
    }

    #[test]
    fn store_starts_empty_and_idle() {
        let store = SessionStore::new();
        assert!(store.snapshot().is_none());
        assert!(!store.is_busy());
    }

    #[test]
    fn begin_operation_claims_the_gate_exclusively() {
        let store = SessionStore::new();
        let guard = store.begin_operation().unwrap();
        assert!(store.is_busy());
        assert!(store.begin_operation().is_none());
        drop(guard);
        assert!(!store.is_busy());
        assert!(store.begin_operation().is_some());
    }

    #[test]
    fn snapshot_returns_a_detached_clone() {
        let store = SessionStore::new();
        store.write(|state| *state = Some(session()));

        let snapshot = store.snapshot().unwrap();
        store.write(|state| *state = None);

        // The clone survives the store being cleared.
        assert_eq!(snapshot.question_number(), 1);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn guard_releases_on_drop_even_mid_failure() {
        let store = SessionStore::new();
        {
            let _guard = store.begin_operation().unwrap();
            // Operation fails here; the guard still releases.
        }
        assert!(!store.is_busy());
    }
}
