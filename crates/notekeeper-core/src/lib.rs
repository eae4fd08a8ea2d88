//! notekeeper-core - Core library for Notekeeper
//!
//! This crate contains the models, the session/notes store, the HTTP client for
//! the notes API and the view controller shared by every Notekeeper interface.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{DraftNote, Note, NoteId, Tag, TagId, User};
pub use store::{Action, Snapshot, Store};
