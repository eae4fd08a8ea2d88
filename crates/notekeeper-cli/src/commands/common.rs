use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use notekeeper_core::api::HttpNotesApi;
use notekeeper_core::controller::{ControllerError, NotesController};
use notekeeper_core::{Note, Store, Tag};
use serde::Serialize;

use crate::auth::KeyringSessionStore;
use crate::config_profiles::{resolve_client_config, CliProfilesConfig};
use crate::error::CliError;

pub type CliController = NotesController<HttpNotesApi, KeyringSessionStore>;

/// A controller wired to the resolved profile's server and keychain session.
pub struct CliContext {
    pub profile_name: String,
    pub controller: CliController,
}

impl CliContext {
    pub fn open(global_profile: Option<&str>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(global_profile);
        let client_config = resolve_client_config(&profile_name, config.profile(&profile_name))?;
        let api = HttpNotesApi::new(&client_config)
            .map_err(|error| CliError::Config(error.to_string()))?;
        let store = Store::initialize(KeyringSessionStore::new(&profile_name))?;

        tracing::debug!(
            "Using profile '{}' against {}",
            profile_name,
            api.base_url()
        );
        let controller =
            NotesController::new(api, Arc::new(store)).with_tag_case(client_config.tag_case);
        Ok(Self {
            profile_name,
            controller,
        })
    }

    /// Fail locally before calls that need a session.
    pub fn require_session(&self) -> Result<(), CliError> {
        if self.controller.snapshot().is_authenticated() {
            Ok(())
        } else {
            Err(ControllerError::NotSignedIn.into())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub created_at: Option<String>,
    pub relative_time: Option<String>,
    pub tags: Vec<String>,
}

pub fn note_to_list_item(note: &Note, now: NaiveDateTime) -> NoteListItem {
    NoteListItem {
        id: note.id.get(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        created_at: note
            .created_at
            .map(|at| at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        relative_time: note.created_at.map(|at| format_relative_time(at, now)),
        tags: note.tag_names().into_iter().map(ToString::to_string).collect(),
    }
}

pub fn format_note_lines(notes: &[Note], now: NaiveDateTime) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let title = truncate(&note.title, 30);
            let preview = note_preview(note, 40);
            let relative_time = note
                .created_at
                .map_or_else(String::new, |at| format_relative_time(at, now));
            let tags = render_tags(note);

            let line = format!(
                "{:>5}  {title:<30}  {preview:<40}  {relative_time}",
                note.id.get()
            );
            if tags.is_empty() {
                line.trim_end().to_string()
            } else {
                format!("{line:<92}  {tags}")
            }
        })
        .collect()
}

pub fn format_tag_lines(tags: &[Tag]) -> Vec<String> {
    tags.iter()
        .map(|tag| format!("{:>5}  #{}", tag.id.get(), tag.name))
        .collect()
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Tags in server order, `#`-prefixed.
pub fn render_tags(note: &Note) -> String {
    note.tag_names()
        .into_iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Server timestamps are naive; they are read as UTC.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn format_relative_time(timestamp: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = now
        .signed_duration_since(timestamp)
        .num_milliseconds()
        .max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
