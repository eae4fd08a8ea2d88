use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_hello(context: &CliContext) -> Result<(), CliError> {
    let snapshot = context.controller.load_hello().await?;
    if let Some(message) = snapshot.message.as_deref() {
        println!("{message}");
    }
    Ok(())
}
