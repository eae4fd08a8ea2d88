//! Authenticated user record

use serde::{Deserialize, Serialize};

/// User record returned by the token endpoint and persisted with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl User {
    /// Label for display; falls back to the numeric id.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("user #{}", self.id))
    }
}
