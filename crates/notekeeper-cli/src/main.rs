//! Notekeeper CLI - read and write tagged notes from the terminal
//!
//! Talks to a notes server through the shared view controller; the session is
//! kept in the OS keychain per profile.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::hello::run_hello;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::commands::tags::run_tags;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        if error.needs_sign_in() {
            eprintln!("Run `notekeeper auth login --name <name> --password <password>` to sign in.");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notekeeper=info,notekeeper_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Auth { command } => run_auth(command, profile).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
        Commands::Hello => run_hello(&CliContext::open(profile)?).await?,
        Commands::List { tag, json } => {
            run_list(&CliContext::open(profile)?, tag.as_deref(), json).await?;
        }
        Commands::Tags { json } => run_tags(&CliContext::open(profile)?, json).await?,
        Commands::Add {
            title,
            content,
            tags,
            json,
        } => {
            run_add(&CliContext::open(profile)?, &title, &content, &tags, json).await?;
        }
        Commands::Show { id, json } => run_show(&CliContext::open(profile)?, &id, json).await?,
    }

    Ok(())
}
