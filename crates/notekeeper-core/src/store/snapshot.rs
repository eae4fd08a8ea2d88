//! Store snapshot and the reducer

use std::fmt;

use crate::models::{Note, User};
use crate::session::PersistedSession;

use super::Action;

/// The full store state at one point in time.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub message: Option<String>,
    pub token: Option<String>,
    pub user: Option<User>,
    pub error: Option<String>,
    pub notes: Vec<Note>,
}

impl Snapshot {
    /// Initial state for a restored session. Notes always start empty.
    #[must_use]
    pub fn from_session(session: PersistedSession) -> Self {
        Self {
            token: session.token,
            user: session.user,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Snapshot")
            .field("message", &self.message)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("error", &self.error)
            .field("notes", &self.notes.len())
            .finish()
    }
}

/// Produce the next snapshot. Pure: persistence is handled by `SessionSync`.
#[must_use]
pub fn reduce(snapshot: &Snapshot, action: &Action) -> Snapshot {
    match action {
        Action::SetHello(message) => Snapshot {
            message: Some(message.clone()),
            ..snapshot.clone()
        },
        Action::Login { token, user } => Snapshot {
            token: Some(token.clone()),
            user: Some(user.clone()),
            error: None,
            ..snapshot.clone()
        },
        Action::Logout => Snapshot {
            token: None,
            user: None,
            notes: Vec::new(),
            ..snapshot.clone()
        },
        Action::SetError(error) => Snapshot {
            error: Some(error.clone()),
            ..snapshot.clone()
        },
        Action::ClearError => Snapshot {
            error: None,
            ..snapshot.clone()
        },
        Action::LoadNotes(notes) => Snapshot {
            notes: notes.clone(),
            ..snapshot.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User {
            id: 1,
            email: Some("ana".to_string()),
            is_active: true,
        }
    }

    #[test]
    fn login_sets_session_and_clears_error() {
        let before = Snapshot {
            error: Some("old".to_string()),
            ..Snapshot::default()
        };
        let after = reduce(
            &before,
            &Action::Login {
                token: "abc".to_string(),
                user: user(),
            },
        );
        assert_eq!(after.token.as_deref(), Some("abc"));
        assert_eq!(after.user, Some(user()));
        assert_eq!(after.error, None);
        assert_eq!(before.error.as_deref(), Some("old"));
    }

    #[test]
    fn logout_clears_session_and_notes_but_keeps_error_and_message() {
        let before = Snapshot {
            message: Some("hi".to_string()),
            token: Some("abc".to_string()),
            user: Some(user()),
            error: Some("e".to_string()),
            notes: vec![Note::new(1, "a", "b")],
        };
        let after = reduce(&before, &Action::Logout);
        assert_eq!(after.token, None);
        assert_eq!(after.user, None);
        assert!(after.notes.is_empty());
        assert_eq!(after.message.as_deref(), Some("hi"));
        assert_eq!(after.error.as_deref(), Some("e"));
    }

    #[test]
    fn notes_follow_most_recent_load() {
        let actions = [
            Action::LoadNotes(vec![Note::new(1, "a", "b")]),
            Action::SetError("x".to_string()),
            Action::LoadNotes(vec![Note::new(2, "c", "d"), Note::new(3, "e", "f")]),
            Action::SetHello("hello".to_string()),
            Action::ClearError,
        ];
        let last = actions.iter().fold(Snapshot::default(), |state, action| {
            reduce(&state, action)
        });
        assert_eq!(
            last.notes,
            vec![Note::new(2, "c", "d"), Note::new(3, "e", "f")]
        );
        assert_eq!(last.message.as_deref(), Some("hello"));
        assert_eq!(last.error, None);
    }

    #[test]
    fn notes_empty_without_load() {
        let state = reduce(&Snapshot::default(), &Action::SetHello("x".to_string()));
        assert!(state.notes.is_empty());
    }

    #[test]
    fn debug_redacts_token() {
        let snapshot = Snapshot {
            token: Some("secret-token".to_string()),
            ..Snapshot::default()
        };
        let rendered = format!("{snapshot:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
