//! Session/notes store.
//!
//! The store holds the current [`Snapshot`] behind an `Arc` and replaces it on
//! every dispatch, so a reader holding an older snapshot never observes a
//! partial update.

mod action;
mod snapshot;

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

pub use action::Action;
pub use snapshot::{reduce, Snapshot};

use crate::error::Result;
use crate::session::{load_persisted_session, SessionPersistence, SessionSync};

pub struct Store<P> {
    current: Mutex<Arc<Snapshot>>,
    sync: SessionSync<P>,
}

impl<P: SessionPersistence> Store<P> {
    /// Build the initial snapshot from persisted session storage.
    pub fn initialize(storage: P) -> Result<Self> {
        let session = load_persisted_session(&storage)?;
        if session.token.is_some() {
            tracing::debug!("Restored persisted session");
        }
        Ok(Self {
            current: Mutex::new(Arc::new(Snapshot::from_session(session))),
            sync: SessionSync::new(storage),
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reduce `action` into a new snapshot.
    ///
    /// Session actions are persisted first. If persistence fails the stored
    /// entries are restored and the current snapshot is kept, so memory and
    /// storage still describe the same session.
    pub fn dispatch(&self, action: Action) -> Result<Arc<Snapshot>> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if action.touches_session() {
            self.sync.observe(&action)?;
        }
        let next = Arc::new(reduce(&current, &action));
        *current = Arc::clone(&next);
        tracing::trace!(action = action.name(), "Dispatched action");
        Ok(next)
    }

    /// Dispatch a `{type, payload}` action. Unknown types leave the snapshot
    /// unchanged.
    pub fn dispatch_wire(&self, kind: &str, payload: Value) -> Result<Arc<Snapshot>> {
        match Action::from_wire(kind, payload)? {
            Some(action) => self.dispatch(action),
            None => {
                tracing::debug!("Ignoring unknown action type '{}'", kind);
                Ok(self.snapshot())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, User};
    use crate::session::test_support::{KeyFailingSessionStore, ReadOnlySessionStore};
    use crate::session::{MemorySessionStore, TOKEN_KEY, USER_KEY};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user() -> User {
        User {
            id: 5,
            email: Some("ana".to_string()),
            is_active: true,
        }
    }

    #[test]
    fn initialize_restores_persisted_session() {
        let storage = MemorySessionStore::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id": 5, "email": "ana", "is_active": true}"#),
        ]);
        let store = Store::initialize(storage).unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.token.as_deref(), Some("abc"));
        assert_eq!(snapshot.user, Some(user()));
        assert!(snapshot.notes.is_empty());
    }

    #[test]
    fn initialize_with_corrupt_user_keeps_token() {
        let storage =
            MemorySessionStore::with_entries([(TOKEN_KEY, "abc"), (USER_KEY, "not-json")]);
        let store = Store::initialize(storage).unwrap();
        assert_eq!(store.snapshot().token.as_deref(), Some("abc"));
        assert_eq!(store.snapshot().user, None);
    }

    #[test]
    fn dispatch_replaces_snapshot() {
        let store = Store::initialize(MemorySessionStore::new()).unwrap();
        let before = store.snapshot();
        let after = store
            .dispatch(Action::LoadNotes(vec![Note::new(1, "a", "b")]))
            .unwrap();

        assert!(before.notes.is_empty());
        assert_eq!(after.notes.len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&after, &store.snapshot()));
    }

    #[test]
    fn login_and_logout_keep_storage_in_sync() {
        let storage = MemorySessionStore::new();
        let store = Store::initialize(storage.clone()).unwrap();

        store
            .dispatch(Action::Login {
                token: "abc".to_string(),
                user: user(),
            })
            .unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        let persisted_user: User =
            serde_json::from_str(&storage.get_item(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted_user, user());

        store.dispatch(Action::Logout).unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
        assert_eq!(store.snapshot().token, None);
    }

    #[test]
    fn failed_persistence_keeps_previous_snapshot() {
        let store = Store::initialize(ReadOnlySessionStore::default()).unwrap();
        let result = store.dispatch(Action::Login {
            token: "abc".to_string(),
            user: user(),
        });
        assert!(result.is_err());
        assert_eq!(store.snapshot().token, None);
    }

    #[test]
    fn unknown_wire_action_returns_same_snapshot() {
        let store = Store::initialize(MemorySessionStore::new()).unwrap();
        let before = store.snapshot();
        let after = store.dispatch_wire("archive_note", json!(3)).unwrap();
        assert!(Arc::ptr_eq(&before, &after));

        let loaded = store
            .dispatch_wire("set_hello", json!("hello from the backend"))
            .unwrap();
        assert_eq!(loaded.message.as_deref(), Some("hello from the backend"));
    }

    #[test]
    fn failed_session_writes_keep_memory_and_storage_agreed() {
        let memory = MemorySessionStore::new();
        let storage = KeyFailingSessionStore::new(memory.clone(), USER_KEY);
        let store = Store::initialize(storage.clone()).unwrap();
        store
            .dispatch(Action::Login {
                token: "abc".to_string(),
                user: user(),
            })
            .unwrap();

        storage.set_failing(true);
        let relogin = store.dispatch(Action::Login {
            token: "def".to_string(),
            user: User {
                id: 6,
                email: Some("bo".to_string()),
                is_active: true,
            },
        });
        assert!(relogin.is_err());
        assert!(store.dispatch(Action::Logout).is_err());

        let restarted = Store::initialize(memory).unwrap();
        assert_eq!(store.snapshot().token.as_deref(), Some("abc"));
        assert_eq!(restarted.snapshot().token, store.snapshot().token);
        assert_eq!(restarted.snapshot().user, store.snapshot().user);
    }
}
