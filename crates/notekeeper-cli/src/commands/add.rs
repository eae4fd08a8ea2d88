use notekeeper_core::models::DraftField;

use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_add(
    context: &CliContext,
    title: &str,
    content: &str,
    tags: &str,
    as_json: bool,
) -> Result<(), CliError> {
    let controller = &context.controller;
    controller.set_draft_field(DraftField::Title, title);
    controller.set_draft_field(DraftField::Content, content);
    controller.set_draft_field(DraftField::Tags, tags);

    let note = controller.submit().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("{}", note.id);
    }
    Ok(())
}
