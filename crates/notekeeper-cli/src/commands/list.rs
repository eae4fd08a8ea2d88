use crate::commands::common::{
    format_note_lines, note_to_list_item, now_utc, CliContext, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    context: &CliContext,
    tag: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    context.controller.fetch_notes(tag).await?;
    let snapshot = context.controller.snapshot();
    let now = now_utc();

    if as_json {
        let json_items = snapshot
            .notes
            .iter()
            .map(|note| note_to_list_item(note, now))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if snapshot.notes.is_empty() {
        match tag {
            Some(tag) => println!("No notes tagged #{tag}"),
            None => println!("No notes yet"),
        }
    } else {
        for line in format_note_lines(&snapshot.notes, now) {
            println!("{line}");
        }
    }

    Ok(())
}
