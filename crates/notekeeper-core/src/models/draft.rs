//! Draft note form state and the create-note payload built from it

use serde::Serialize;
use thiserror::Error;

/// A note being composed. `tags` holds the raw comma-separated input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftNote {
    pub title: String,
    pub content: String,
    pub tags: String,
}

/// Field selector for draft form input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Content,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and content are required")]
    TitleAndContentRequired,
    #[error("Name and password are required")]
    CredentialsRequired,
}

/// Reject blank sign-in or sign-up credentials before any request is made.
pub fn validate_credentials(name: &str, password: &str) -> Result<(), ValidationError> {
    if name.is_empty() || password.is_empty() {
        return Err(ValidationError::CredentialsRequired);
    }
    Ok(())
}

/// Body of `POST /api/notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl DraftNote {
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.title = value,
            DraftField::Content => self.content = value,
            DraftField::Tags => self.tags = value,
        }
    }

    /// Only empty fields are missing; whitespace is sent as typed and left
    /// for the server to judge.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() || self.content.is_empty() {
            return Err(ValidationError::TitleAndContentRequired);
        }
        Ok(())
    }

    /// Validate and build the request body.
    pub fn to_new_note(&self) -> Result<NewNote, ValidationError> {
        self.validate()?;
        Ok(NewNote {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: parse_tag_list(&self.tags),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Split comma-separated tag input.
///
/// Entries are trimmed and empty entries dropped. Order is preserved and
/// duplicates are kept.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}
