use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notekeeper_core::models::TagCase;

#[derive(Parser)]
#[command(name = "notekeeper")]
#[command(about = "Read and write tagged notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (server URL and stored session)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the server's greeting
    Hello,
    /// List notes, optionally filtered by tag
    List {
        /// Only show notes carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tags
    Tags {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Comma-separated tag names, e.g. "work, ideas"
        #[arg(long, default_value = "")]
        tags: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign up, sign in and out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TagCaseArg {
    Sensitive,
    Insensitive,
}

impl From<TagCaseArg> for TagCase {
    fn from(value: TagCaseArg) -> Self {
        match value {
            TagCaseArg::Sensitive => Self::Sensitive,
            TagCaseArg::Insensitive => Self::Insensitive,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Notes API base URL (e.g. <https://notes.example.com>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// How tag names are compared when filtering
        #[arg(long, value_enum, value_name = "MODE")]
        tag_case: Option<TagCaseArg>,
        /// Request timeout in seconds (0 disables it)
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account
    Signup {
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign in and store the session in the keychain
    Login {
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show auth status for profile
    Status,
    /// Sign out and clear the stored session
    Logout,
}
