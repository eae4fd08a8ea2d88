//! Notes view controller.
//!
//! Orchestrates API calls for notes and tags, owns the draft note form and the
//! tag filter selection, and dispatches results into the [`Store`].
//!
//! Every write to the notes list takes a generation ticket. A response whose
//! ticket is no longer current when it arrives is dropped, so a slow request
//! can never overwrite the result of a newer one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::api::{ApiError, NotesApi};
use crate::models::{
    validate_credentials, DraftField, DraftNote, Note, NoteId, Tag, TagCase, ValidationError,
};
use crate::session::SessionPersistence;
use crate::store::{Action, Snapshot, Store};

pub const NETWORK_ERROR_MESSAGE: &str = "Could not reach the notes server";
pub const PAYLOAD_ERROR_MESSAGE: &str = "Unexpected response from the notes server";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("You must sign in first")]
    NotSignedIn,
    #[error(transparent)]
    Store(#[from] crate::Error),
}

impl ControllerError {
    /// Text shown in the snapshot's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Network(_)) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api(ApiError::Payload(_)) => PAYLOAD_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// What happened to a notes-list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request superseded this one; its result was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct ViewState {
    tags: Vec<Tag>,
    selected_tag: Option<String>,
    draft: DraftNote,
    generation: u64,
}

/// Clears its share of the loading flag on drop.
struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn new(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct NotesController<A, P> {
    api: A,
    store: Arc<Store<P>>,
    tag_case: TagCase,
    view: Mutex<ViewState>,
    in_flight: AtomicUsize,
}

impl<A: NotesApi, P: SessionPersistence> NotesController<A, P> {
    pub fn new(api: A, store: Arc<Store<P>>) -> Self {
        Self {
            api,
            store,
            tag_case: TagCase::default(),
            view: Mutex::new(ViewState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn with_tag_case(mut self, tag_case: TagCase) -> Self {
        self.tag_case = tag_case;
        self
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &Arc<Store<P>> {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.lock_view().tags.clone()
    }

    pub fn selected_tag(&self) -> Option<String> {
        self.lock_view().selected_tag.clone()
    }

    pub fn draft(&self) -> DraftNote {
        self.lock_view().draft.clone()
    }

    pub fn set_draft_field(&self, field: DraftField, value: impl Into<String>) {
        self.lock_view().draft.set(field, value);
    }

    /// Load notes for the current filter and the tag list.
    pub async fn refresh(&self) -> ControllerResult<FetchOutcome> {
        let selected = self.selected_tag();
        let outcome = self.fetch_notes(selected.as_deref()).await;
        self.fetch_tags().await;
        outcome
    }

    /// Replace the notes list with the server's, optionally scoped to a tag.
    pub async fn fetch_notes(&self, tag_name: Option<&str>) -> ControllerResult<FetchOutcome> {
        let _loading = LoadingGuard::new(&self.in_flight);
        self.store.dispatch(Action::ClearError)?;
        let ticket = self.next_generation();

        let Some(token) = self.token() else {
            return Err(self.report(ControllerError::NotSignedIn));
        };

        match self.api.list_notes(&token, tag_name).await {
            Ok(notes) => self.apply_if_current(ticket, Action::LoadNotes(notes)),
            Err(error) => {
                if self.is_current(ticket) {
                    Err(self.report(error.into()))
                } else {
                    tracing::debug!("Dropping stale notes failure: {}", error);
                    Ok(FetchOutcome::Stale)
                }
            }
        }
    }

    /// Reload the tag list. Failures are logged and never shown to the user.
    pub async fn fetch_tags(&self) {
        let Some(token) = self.token() else {
            tracing::debug!("Skipping tag refresh without a session");
            return;
        };

        match self.api.list_tags(&token).await {
            Ok(tags) => self.lock_view().tags = tags,
            Err(error) => tracing::warn!("Failed to load tags: {}", error),
        }
    }

    /// Toggle the tag filter and refetch.
    ///
    /// Selecting the active tag clears the filter; any other tag becomes the
    /// only active filter.
    pub async fn handle_filter_by_tag(&self, tag_name: &str) -> ControllerResult<FetchOutcome> {
        let next = {
            let mut view = self.lock_view();
            let is_active = view
                .selected_tag
                .as_deref()
                .is_some_and(|selected| self.tag_case.same_name(selected, tag_name));
            view.selected_tag = if is_active {
                None
            } else {
                Some(tag_name.to_string())
            };
            view.selected_tag.clone()
        };

        self.fetch_notes(next.as_deref()).await
    }

    /// Create a note from the draft form.
    ///
    /// On success the new note is prepended to the current list, the draft is
    /// cleared and the tag list refreshed.
    pub async fn submit(&self) -> ControllerResult<Note> {
        let body = match self.draft().to_new_note() {
            Ok(body) => body,
            Err(error) => return Err(self.report(error.into())),
        };

        let _loading = LoadingGuard::new(&self.in_flight);
        self.store.dispatch(Action::ClearError)?;
        let Some(token) = self.token() else {
            return Err(self.report(ControllerError::NotSignedIn));
        };

        let note = match self.api.create_note(&token, &body).await {
            Ok(note) => note,
            Err(error) => return Err(self.report(error.into())),
        };

        {
            let mut view = self.lock_view();
            // Any list fetch still in flight predates this note.
            view.generation += 1;
            let current = self.store.snapshot();
            let notes = std::iter::once(note.clone())
                .chain(current.notes.iter().cloned())
                .collect();
            self.store.dispatch(Action::LoadNotes(notes))?;
            view.draft.clear();
        }

        self.fetch_tags().await;
        Ok(note)
    }

    /// Read a single note without touching the notes list.
    pub async fn fetch_note(&self, id: NoteId) -> ControllerResult<Note> {
        let _loading = LoadingGuard::new(&self.in_flight);
        let Some(token) = self.token() else {
            return Err(self.report(ControllerError::NotSignedIn));
        };

        self.api
            .get_note(&token, id)
            .await
            .map_err(|error| self.report(error.into()))
    }

    pub async fn login(&self, name: &str, password: &str) -> ControllerResult<Arc<Snapshot>> {
        if let Err(error) = validate_credentials(name, password) {
            return Err(self.report(error.into()));
        }

        let _loading = LoadingGuard::new(&self.in_flight);
        let response = match self.api.sign_in(name, password).await {
            Ok(response) => response,
            Err(error) => return Err(self.report(error.into())),
        };

        tracing::info!("Signed in as user {}", response.user.id);
        Ok(self.store.dispatch(Action::Login {
            token: response.access_token,
            user: response.user,
        })?)
    }

    /// Register an account; returns the server's confirmation message.
    pub async fn sign_up(&self, name: &str, password: &str) -> ControllerResult<String> {
        if let Err(error) = validate_credentials(name, password) {
            return Err(self.report(error.into()));
        }

        let _loading = LoadingGuard::new(&self.in_flight);
        self.api
            .sign_up(name, password)
            .await
            .map_err(|error| self.report(error.into()))
    }

    /// Sign out, dropping view state tied to the old session.
    pub fn logout(&self) -> ControllerResult<Arc<Snapshot>> {
        let mut view = self.lock_view();
        let snapshot = self.store.dispatch(Action::Logout)?;
        view.generation += 1;
        view.tags.clear();
        view.selected_tag = None;
        Ok(snapshot)
    }

    /// Fetch the public greeting into the snapshot's `message`.
    pub async fn load_hello(&self) -> ControllerResult<Arc<Snapshot>> {
        match self.api.hello().await {
            Ok(message) => Ok(self.store.dispatch(Action::SetHello(message))?),
            Err(error) => {
                tracing::warn!("Failed to load backend message: {}", error);
                Err(error.into())
            }
        }
    }

    fn token(&self) -> Option<String> {
        self.store.snapshot().token.clone()
    }

    fn lock_view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_generation(&self) -> u64 {
        let mut view = self.lock_view();
        view.generation += 1;
        view.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.lock_view().generation == ticket
    }

    fn apply_if_current(&self, ticket: u64, action: Action) -> ControllerResult<FetchOutcome> {
        let view = self.lock_view();
        if view.generation != ticket {
            tracing::debug!(
                "Dropping stale {} response (ticket {}, current {})",
                action.name(),
                ticket,
                view.generation
            );
            return Ok(FetchOutcome::Stale);
        }
        self.store.dispatch(action)?;
        Ok(FetchOutcome::Applied)
    }

    /// Surface `error` in the snapshot and hand it back to the caller.
    fn report(&self, error: ControllerError) -> ControllerError {
        if let ControllerError::Api(ApiError::Network(detail)) = &error {
            tracing::warn!("Notes API unreachable: {}", detail);
        } else {
            tracing::debug!("Notes operation failed: {}", error);
        }
        if let Err(store_error) = self.store.dispatch(Action::SetError(error.user_message())) {
            tracing::warn!("Failed to record error in store: {}", store_error);
        }
        error
    }
}
