//! Persisted session storage and the layer that keeps it in step with the store.
//!
//! Storage is a plain string key-value interface with two entries: the raw
//! bearer token under [`TOKEN_KEY`] and the JSON-serialized user under
//! [`USER_KEY`]. The reducer never touches storage; [`SessionSync`] observes
//! `Login`/`Logout` actions and writes or clears both entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::models::User;
use crate::store::Action;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub trait SessionPersistence: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with raw entries, as a previous run would have left them.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.entries.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, value) in entries {
                guard.insert(key.to_string(), value.to_string());
            }
        }
        store
    }
}

impl SessionPersistence for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(key);
        Ok(())
    }
}

/// Session state read back from storage at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Read the persisted token and user.
///
/// A user entry that fails to deserialize is logged and treated as absent;
/// it never fails startup. Backend read errors are returned.
pub fn load_persisted_session<P: SessionPersistence + ?Sized>(
    storage: &P,
) -> Result<PersistedSession> {
    let token = storage
        .get_item(TOKEN_KEY)?
        .filter(|token| !token.is_empty());
    let user = match storage.get_item(USER_KEY)? {
        Some(raw) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!("Ignoring unreadable persisted user: {}", error);
                None
            }
        },
        None => None,
    };

    Ok(PersistedSession { token, user })
}

/// Writes and clears persisted session entries in response to store actions.
#[derive(Debug, Clone)]
pub struct SessionSync<P> {
    storage: P,
}

impl<P: SessionPersistence> SessionSync<P> {
    pub const fn new(storage: P) -> Self {
        Self { storage }
    }

    /// Apply the persistence side effect of `action`, if it has one.
    ///
    /// A failed write restores the entries already changed, so storage keeps
    /// the session it held before the action.
    pub fn observe(&self, action: &Action) -> Result<()> {
        match action {
            Action::Login { token, user } => {
                let serialized_user = serde_json::to_string(user)?;
                self.replace_entries(&[
                    (TOKEN_KEY, Some(token.as_str())),
                    (USER_KEY, Some(serialized_user.as_str())),
                ])?;
                tracing::debug!("Persisted session for user {}", user.id);
                Ok(())
            }
            Action::Logout => {
                self.replace_entries(&[(TOKEN_KEY, None), (USER_KEY, None)])?;
                tracing::debug!("Cleared persisted session");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Write each `(key, value)` in order; `None` removes the entry.
    fn replace_entries(&self, entries: &[(&str, Option<&str>)]) -> Result<()> {
        let previous = entries
            .iter()
            .map(|(key, _)| self.storage.get_item(key))
            .collect::<Result<Vec<_>>>()?;

        for (written, (key, value)) in entries.iter().enumerate() {
            let Err(error) = write_entry(&self.storage, key, *value) else {
                continue;
            };
            let restored = entries[..written]
                .iter()
                .zip(&previous)
                .rev()
                .try_for_each(|((key, _), old)| write_entry(&self.storage, key, old.as_deref()));
            return Err(match restored {
                Ok(()) => error,
                Err(rollback_error) => {
                    tracing::error!(
                        "Persisted session is inconsistent: {}; restoring failed: {}",
                        error,
                        rollback_error
                    );
                    Error::Storage(format!(
                        "{error}; restoring the previous session also failed: {rollback_error}"
                    ))
                }
            });
        }
        Ok(())
    }
}

fn write_entry<P: SessionPersistence + ?Sized>(
    storage: &P,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    match value {
        Some(value) => storage.set_item(key, value),
        None => storage.remove_item(key),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{
        KeyFailingSessionStore, ReadOnlySessionStore, WriteBudgetSessionStore,
    };
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_user() -> User {
        User {
            id: 1,
            email: Some("ana".to_string()),
            is_active: true,
        }
    }

    #[test]
    fn load_reads_token_and_user() {
        let storage = MemorySessionStore::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id": 1, "email": "ana", "is_active": true}"#),
        ]);
        let session = load_persisted_session(&storage).unwrap();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, Some(sample_user()));
    }

    #[test]
    fn load_treats_corrupt_user_as_absent() {
        let storage =
            MemorySessionStore::with_entries([(TOKEN_KEY, "abc"), (USER_KEY, "{not json")]);
        let session = load_persisted_session(&storage).unwrap();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, None);
    }

    #[test]
    fn load_empty_storage_is_anonymous() {
        let session = load_persisted_session(&MemorySessionStore::new()).unwrap();
        assert_eq!(session, PersistedSession::default());
    }

    #[test]
    fn login_then_logout_round_trips_storage() {
        let storage = MemorySessionStore::new();
        let sync = SessionSync::new(storage.clone());

        sync.observe(&Action::Login {
            token: "abc".to_string(),
            user: sample_user(),
        })
        .unwrap();
        let persisted = load_persisted_session(&storage).unwrap();
        assert_eq!(persisted.token.as_deref(), Some("abc"));
        assert_eq!(persisted.user, Some(sample_user()));

        sync.observe(&Action::Logout).unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn other_actions_leave_storage_alone() {
        let storage = MemorySessionStore::with_entries([(TOKEN_KEY, "abc")]);
        let sync = SessionSync::new(storage.clone());
        sync.observe(&Action::SetError("boom".to_string())).unwrap();
        sync.observe(&Action::LoadNotes(Vec::new())).unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn read_only_storage_reports_write_failures() {
        let sync = SessionSync::new(ReadOnlySessionStore::default());
        let error = sync.observe(&Action::Logout).unwrap_err();
        assert!(matches!(error, Error::Storage(_)));
    }

    fn other_user() -> User {
        User {
            id: 2,
            email: Some("bo".to_string()),
            is_active: true,
        }
    }

    fn login(token: &str, user: User) -> Action {
        Action::Login {
            token: token.to_string(),
            user,
        }
    }

    #[test]
    fn failed_relogin_keeps_previous_session() {
        let memory = MemorySessionStore::new();
        let storage = KeyFailingSessionStore::new(memory.clone(), USER_KEY);
        let sync = SessionSync::new(storage.clone());
        sync.observe(&login("first", sample_user())).unwrap();

        storage.set_failing(true);
        let error = sync.observe(&login("second", other_user())).unwrap_err();
        assert!(matches!(error, Error::Storage(message) if !message.contains("restoring")));

        let persisted = load_persisted_session(&memory).unwrap();
        assert_eq!(persisted.token.as_deref(), Some("first"));
        assert_eq!(persisted.user, Some(sample_user()));
    }

    #[test]
    fn failed_logout_keeps_stored_session() {
        let memory = MemorySessionStore::new();
        let storage = KeyFailingSessionStore::new(memory.clone(), USER_KEY);
        let sync = SessionSync::new(storage.clone());
        sync.observe(&login("first", sample_user())).unwrap();

        storage.set_failing(true);
        assert!(sync.observe(&Action::Logout).is_err());

        let persisted = load_persisted_session(&memory).unwrap();
        assert_eq!(persisted.token.as_deref(), Some("first"));
        assert_eq!(persisted.user, Some(sample_user()));
    }

    #[test]
    fn failed_first_login_leaves_storage_empty() {
        let memory = MemorySessionStore::new();
        let storage = KeyFailingSessionStore::new(memory.clone(), USER_KEY);
        storage.set_failing(true);

        assert!(SessionSync::new(storage).observe(&login("first", sample_user())).is_err());
        assert_eq!(memory.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(memory.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn failed_restore_is_reported() {
        let memory = MemorySessionStore::with_entries([(TOKEN_KEY, "first")]);
        // The token write succeeds, then the user write and the token restore fail.
        let sync = SessionSync::new(WriteBudgetSessionStore::new(memory.clone(), 1));

        let error = sync.observe(&login("second", other_user())).unwrap_err();
        assert!(matches!(error, Error::Storage(_)));
        let message = error.to_string();
        assert!(message.contains("write to 'user' rejected"));
        assert!(message.contains("restoring the previous session also failed"));
        assert_eq!(memory.get_item(TOKEN_KEY).unwrap().as_deref(), Some("second"));
    }
}
