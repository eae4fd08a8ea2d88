//! Session storage backed by the OS keychain, one entry set per profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

use keyring::Entry;

use notekeeper_core::session::SessionPersistence;
use notekeeper_core::{Error, Result};

const KEYRING_SERVICE_NAME: &str = "notekeeper-cli";

/// Stores the session's `token` and `user` entries for one profile.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    profile_name: String,
}

impl KeyringSessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
        }
    }

    fn username(&self, key: &str) -> String {
        format!("{key}:{}", self.profile_name)
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username(key))
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl SessionPersistence for KeyringSessionStore {
    #[cfg(not(test))]
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(&self.username(key)).cloned())
    }

    #[cfg(not(test))]
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(self.username(key), value.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn remove_item(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn remove_item(&self, key: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&self.username(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use notekeeper_core::models::User;
    use notekeeper_core::session::{load_persisted_session, TOKEN_KEY};
    use notekeeper_core::{Action, Store};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entries_are_scoped_per_profile() {
        let work = KeyringSessionStore::new("auth-scope-work");
        let home = KeyringSessionStore::new("auth-scope-home");

        work.set_item(TOKEN_KEY, "work-token").unwrap();

        assert_eq!(
            work.get_item(TOKEN_KEY).unwrap().as_deref(),
            Some("work-token")
        );
        assert_eq!(home.get_item(TOKEN_KEY).unwrap(), None);

        work.remove_item(TOKEN_KEY).unwrap();
        assert_eq!(work.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    fn entries_resolve_to_the_platform_keychain() {
        let entry = KeyringSessionStore::new("auth-platform").entry(TOKEN_KEY).unwrap();
        assert!(entry
            .get_credential()
            .downcast_ref::<keyring::mock::MockCredential>()
            .is_none());
    }

    #[test]
    fn remove_missing_entry_is_ok() {
        let store = KeyringSessionStore::new("auth-remove-missing");
        assert!(store.remove_item(TOKEN_KEY).is_ok());
    }

    #[test]
    fn store_session_survives_restart() {
        let profile = "auth-restart";
        let user = User {
            id: 9,
            email: Some("ana@example.com".to_string()),
            is_active: true,
        };

        let store = Store::initialize(KeyringSessionStore::new(profile)).unwrap();
        store
            .dispatch(Action::Login {
                token: "jwt".to_string(),
                user: user.clone(),
            })
            .unwrap();

        let restored = Store::initialize(KeyringSessionStore::new(profile)).unwrap();
        assert_eq!(restored.snapshot().token.as_deref(), Some("jwt"));
        assert_eq!(restored.snapshot().user, Some(user));

        restored.dispatch(Action::Logout).unwrap();
        let session = load_persisted_session(&KeyringSessionStore::new(profile)).unwrap();
        assert_eq!(session.token, None);
        assert_eq!(session.user, None);
    }
}
