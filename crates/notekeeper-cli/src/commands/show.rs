use notekeeper_core::NoteId;

use crate::commands::common::{format_relative_time, now_utc, render_tags, CliContext};
use crate::error::CliError;

pub fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    raw.parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(raw.trim().to_string()))
}

pub async fn run_show(context: &CliContext, id: &str, as_json: bool) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let note = context.controller.fetch_note(note_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    println!("#{} {}", note.id, note.title);
    if let Some(created_at) = note.created_at {
        println!(
            "created {} ({})",
            created_at.format("%Y-%m-%d %H:%M"),
            format_relative_time(created_at, now_utc())
        );
    }
    let tags = render_tags(&note);
    if !tags.is_empty() {
        println!("{tags}");
    }
    println!();
    println!("{}", note.content);
    Ok(())
}
