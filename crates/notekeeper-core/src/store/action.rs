//! Store actions

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Note, User};

/// Every state transition the store accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetHello(String),
    Login { token: String, user: User },
    Logout,
    SetError(String),
    ClearError,
    LoadNotes(Vec<Note>),
}

#[derive(Deserialize)]
struct LoginPayload {
    token: String,
    user: User,
}

impl Action {
    /// Stable action type name, matching the wire representation.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetHello(_) => "set_hello",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::SetError(_) => "set_error",
            Self::ClearError => "clear_error",
            Self::LoadNotes(_) => "load_notes",
        }
    }

    /// Whether dispatching this action writes persistent session storage.
    pub const fn touches_session(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Logout)
    }

    /// Decode a `{type, payload}` style action.
    ///
    /// Unknown types decode to `Ok(None)`. A known type with a payload of the
    /// wrong shape is an error.
    pub fn from_wire(kind: &str, payload: Value) -> Result<Option<Self>> {
        let action = match kind {
            "set_hello" => Self::SetHello(serde_json::from_value(payload)?),
            "login" => {
                let LoginPayload { token, user } = serde_json::from_value(payload)?;
                Self::Login { token, user }
            }
            "logout" => Self::Logout,
            "set_error" => Self::SetError(serde_json::from_value(payload)?),
            "clear_error" => Self::ClearError,
            "load_notes" => Self::LoadNotes(serde_json::from_value(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_wire_decodes_known_actions() {
        let action = Action::from_wire(
            "login",
            json!({"token": "abc", "user": {"id": 1, "email": "ana", "is_active": true}}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(action.name(), "login");
        assert!(action.touches_session());

        let notes = Action::from_wire(
            "load_notes",
            json!([{"id": 1, "title": "a", "content": "b", "tags": []}]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            notes,
            Action::LoadNotes(vec![Note::new(1, "a", "b")])
        );

        assert_eq!(
            Action::from_wire("logout", Value::Null).unwrap(),
            Some(Action::Logout)
        );
    }

    #[test]
    fn from_wire_ignores_unknown_types() {
        assert_eq!(Action::from_wire("rename_note", json!("x")).unwrap(), None);
    }

    #[test]
    fn from_wire_rejects_malformed_payload() {
        assert!(Action::from_wire("set_error", json!({"nope": 1})).is_err());
    }

    #[test]
    fn only_login_and_logout_touch_session() {
        assert!(Action::Logout.touches_session());
        assert!(!Action::SetHello("hi".to_string()).touches_session());
        assert!(!Action::ClearError.touches_session());
    }
}
