use crate::commands::common::{format_tag_lines, CliContext};
use crate::error::CliError;

pub async fn run_tags(context: &CliContext, as_json: bool) -> Result<(), CliError> {
    context.require_session()?;
    context.controller.fetch_tags().await;
    let tags = context.controller.tags();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for line in format_tag_lines(&tags) {
            println!("{line}");
        }
    }

    Ok(())
}
