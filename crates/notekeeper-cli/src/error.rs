use std::io;

use notekeeper_core::controller::ControllerError;
use thiserror::Error;

const UNAUTHORIZED: u16 = 401;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notekeeper_core::Error),
    #[error("{}", .0.user_message())]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid note id: {0}")]
    InvalidNoteId(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No notes server configured for profile '{0}'. Run `notekeeper config init --api-base-url <URL>` or set NOTEKEEPER_API_URL."
    )]
    NotConfigured(String),
}

impl CliError {
    /// Whether signing in again is the likely fix: no stored session, or the
    /// server rejected the stored token.
    pub fn needs_sign_in(&self) -> bool {
        match self {
            Self::Controller(ControllerError::NotSignedIn) => true,
            Self::Controller(ControllerError::Api(error)) => error.status() == Some(UNAUTHORIZED),
            _ => false,
        }
    }
}
