//! HTTP client for the notes API.
//!
//! [`NotesApi`] is the seam between the view controller and the network. The
//! production implementation, [`HttpNotesApi`], talks JSON over `reqwest`;
//! tests substitute scripted implementations.

use std::future::Future;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{NewNote, Note, NoteId, Tag, User};
use crate::util::log_excerpt;

pub const DEFAULT_LOAD_NOTES_ERROR: &str = "Failed to load notes";
pub const DEFAULT_LOAD_NOTE_ERROR: &str = "Failed to load note";
pub const DEFAULT_LOAD_TAGS_ERROR: &str = "Failed to load tags";
pub const DEFAULT_CREATE_NOTE_ERROR: &str = "Failed to create note";
pub const DEFAULT_SIGN_IN_ERROR: &str = "Failed to sign in";
pub const DEFAULT_SIGN_UP_ERROR: &str = "Failed to sign up";
pub const DEFAULT_HELLO_ERROR: &str = "Failed to load the backend message";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` comes from the `error` field of the body,
    /// or the call site's default.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// Transport failure before any response arrived.
    #[error("Network request failed: {0}")]
    Network(String),
    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response payload: {0}")]
    Payload(String),
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
}

impl ApiError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Successful response of `POST /api/token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Operations the client performs against the notes API.
///
/// Methods taking a `token` send it as a bearer credential; the others are
/// anonymous.
pub trait NotesApi: Send + Sync {
    fn hello(&self) -> impl Future<Output = ApiResult<String>> + Send;

    /// Register an account. Returns the server's confirmation message.
    fn sign_up(&self, name: &str, password: &str)
        -> impl Future<Output = ApiResult<String>> + Send;

    fn sign_in(
        &self,
        name: &str,
        password: &str,
    ) -> impl Future<Output = ApiResult<LoginResponse>> + Send;

    /// List the user's notes, optionally scoped to one tag name.
    fn list_notes(
        &self,
        token: &str,
        tag: Option<&str>,
    ) -> impl Future<Output = ApiResult<Vec<Note>>> + Send;

    fn get_note(&self, token: &str, id: NoteId)
        -> impl Future<Output = ApiResult<Note>> + Send;

    fn list_tags(&self, token: &str) -> impl Future<Output = ApiResult<Vec<Tag>>> + Send;

    fn create_note(
        &self,
        token: &str,
        note: &NewNote,
    ) -> impl Future<Output = ApiResult<Note>> + Send;
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    #[serde(rename = "Nombre")]
    name: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// `reqwest`-backed [`NotesApi`].
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    base_url: String,
    client: Client,
}

impl HttpNotesApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base_url = crate::config::normalize_base_url(&config.api_base_url)
            .map_err(|error| ApiError::InvalidConfiguration(error.to_string()))?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| ApiError::InvalidConfiguration(error.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        default_message: &str,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                "API request failed with HTTP {}: {}",
                status.as_u16(),
                log_excerpt(&body)
            );
            return Err(ApiError::Request {
                status: status.as_u16(),
                message: parse_api_error(&body, default_message),
            });
        }

        serde_json::from_str(&body).map_err(|error| ApiError::Payload(error.to_string()))
    }
}

impl NotesApi for HttpNotesApi {
    async fn hello(&self) -> ApiResult<String> {
        let request = self
            .client
            .get(self.url("/api/hello"))
            .header(ACCEPT, "application/json");
        let payload: MessageResponse = Self::send_json(request, DEFAULT_HELLO_ERROR).await?;
        Ok(payload.message)
    }

    async fn sign_up(&self, name: &str, password: &str) -> ApiResult<String> {
        let request = self
            .client
            .post(self.url("/api/signup"))
            .json(&Credentials { name, password });
        let payload: MessageResponse = Self::send_json(request, DEFAULT_SIGN_UP_ERROR).await?;
        Ok(payload.message)
    }

    async fn sign_in(&self, name: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = self
            .client
            .post(self.url("/api/token"))
            .json(&Credentials { name, password });
        Self::send_json(request, DEFAULT_SIGN_IN_ERROR).await
    }

    async fn list_notes(&self, token: &str, tag: Option<&str>) -> ApiResult<Vec<Note>> {
        let path = tag.map_or_else(
            || "/api/notes".to_string(),
            |tag| format!("/api/tags/{}/notes", urlencoding::encode(tag)),
        );
        let request = Self::authorized(self.client.get(self.url(&path)), token);
        Self::send_json(request, DEFAULT_LOAD_NOTES_ERROR).await
    }

    async fn get_note(&self, token: &str, id: NoteId) -> ApiResult<Note> {
        let request = Self::authorized(
            self.client.get(self.url(&format!("/api/notes/{id}"))),
            token,
        );
        Self::send_json(request, DEFAULT_LOAD_NOTE_ERROR).await
    }

    async fn list_tags(&self, token: &str) -> ApiResult<Vec<Tag>> {
        let request = Self::authorized(self.client.get(self.url("/api/tags")), token);
        Self::send_json(request, DEFAULT_LOAD_TAGS_ERROR).await
    }

    async fn create_note(&self, token: &str, note: &NewNote) -> ApiResult<Note> {
        let request = Self::authorized(self.client.post(self.url("/api/notes")), token).json(note);
        Self::send_json(request, DEFAULT_CREATE_NOTE_ERROR).await
    }
}

/// Extract `{error}` from a failure body, falling back to `default_message`.
pub fn parse_api_error(body: &str, default_message: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| default_message.to_string())
}
