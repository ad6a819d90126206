// Session Ledger Store - one immutable ledger per session id
//
// Ledgers are shared behind Arc; the map lock is held only for the
// pointer swap or clone, so sessions never block on each other's
// reconciliation work and readers always see a complete ledger.

use crate::model::Ledger;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Mint a fresh session identifier. Sessions are plain opaque strings
/// to the store; callers that already have an identity scheme can skip
/// this and key entries however they like.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory store keyed by explicit session identifier.
///
/// Entries have no TTL and are never evicted; a session's ledger lives
/// until the session is removed or the process exits. Retention is
/// therefore unbounded under session churn.
#[derive(Debug, Default)]
pub struct SessionStore {
    ledgers: RwLock<HashMap<String, Arc<Ledger>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session's ledger atomically. A reader holding the
    /// previous Arc keeps a consistent snapshot of the old ledger.
    pub fn put(&self, session_id: &str, ledger: Ledger) {
        let mut map = self
            .ledgers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        map.insert(session_id.to_string(), Arc::new(ledger));
    }

    /// Fetch the current ledger for a session, if one has been stored.
    pub fn get(&self, session_id: &str) -> Option<Arc<Ledger>> {
        let map = self
            .ledgers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        map.get(session_id).cloned()
    }

    /// Drop a session's ledger entirely (session destruction).
    pub fn remove(&self, session_id: &str) -> Option<Arc<Ledger>> {
        let mut map = self
            .ledgers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        map.remove(session_id)
    }

    pub fn len(&self) -> usize {
        self.ledgers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
