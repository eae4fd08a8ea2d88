//! Note model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tag::Tag;

/// Server-assigned identifier for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A note owned by the server. The client only creates and reads notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Resolved tags, in server order
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Creation time as reported by the server (naive UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    /// Owner id as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Note {
    /// Create a note value without server metadata.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: NoteId::new(id),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            created_at: None,
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Tag names in server order
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn note_deserializes_server_payload() {
        let payload = r#"{
            "id": 7,
            "title": "T",
            "content": "C",
            "created_at": "2024-05-01T09:30:00.123456",
            "user_id": 2,
            "tags": [{"id": 1, "name": "x"}]
        }"#;

        let note: Note = serde_json::from_str(payload).unwrap();
        assert_eq!(note.id, NoteId::new(7));
        assert_eq!(note.title, "T");
        assert_eq!(note.tag_names(), vec!["x"]);
        assert_eq!(note.user_id, Some(2));
        assert!(note.created_at.is_some());
    }

    #[test]
    fn note_without_optional_fields_deserializes() {
        let note: Note =
            serde_json::from_str(r#"{"id": 1, "title": "a", "content": "b"}"#).unwrap();
        assert_eq!(note, Note::new(1, "a", "b"));
    }

    #[test]
    fn note_id_parse() {
        let id: NoteId = "7".parse().unwrap();
        assert_eq!(id, NoteId::new(7));
        assert_eq!(id.to_string(), "7");
    }
}
